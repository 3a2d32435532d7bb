//! Blender smoke-test handler
//!
//! Verifies the Blender installation end to end without queueing a job:
//! writes a minimal cube-export script, runs it headless, and reports
//! whether the STL appeared.

use std::path::PathBuf;

use axum::{extract::State, Json};
use serde::Serialize;

use meshforge_blender::BlenderError;
use meshforge_common::{BlenderExecMode, Error, Result};

use crate::api::middleware::JobsState;

const SMOKE_SCRIPT: &str = r#"import bpy

# Clean scene
bpy.ops.object.select_all(action='SELECT')
bpy.ops.object.delete(use_global=False)

# Add cube
bpy.ops.mesh.primitive_cube_add(size=20, location=(0, 0, 10))
obj = bpy.context.active_object
obj.name = "SmokeCube"

# Export STL
export_path = bpy.path.abspath("//smoke_cube.stl")
bpy.ops.export_mesh.stl(filepath=export_path)

print("OK_EXPORT:", export_path)
"#;

/// Smoke-test report
#[derive(Debug, Serialize)]
pub struct SmokeResponse {
    pub ok: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exec_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returncode: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stl_exists: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stl_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blender_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workdir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stdout_tail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr_tail: Option<String>,
}

/// Run the Blender smoke test: create a cube, export STL, report the outcome
pub async fn blender_smoke(State(state): State<JobsState>) -> Result<Json<SmokeResponse>> {
    let mode = state.config.blender_exec_mode;
    if mode != BlenderExecMode::ServerHeadless {
        return Ok(Json(SmokeResponse {
            ok: false,
            message: format!(
                "Blender execution mode is '{}', not 'server_headless'",
                mode.as_str()
            ),
            exec_mode: Some(mode.as_str().to_string()),
            suggestion: Some(
                "Set BLENDER_EXEC_MODE=server_headless in .env to enable headless execution"
                    .to_string(),
            ),
            returncode: None,
            stl_exists: None,
            stl_path: None,
            blender_path: None,
            workdir: None,
            stdout_tail: None,
            stderr_tail: None,
        }));
    }

    let workdir = PathBuf::from(&state.config.blender_workdir).join("smoke_test");
    tokio::fs::create_dir_all(&workdir).await?;

    let script_path = workdir.join("smoke_test.py");
    let stl_path = workdir.join("smoke_cube.stl");
    tokio::fs::write(&script_path, SMOKE_SCRIPT).await?;

    let report = state
        .blender
        .run_script(&script_path, &workdir)
        .await
        .map_err(|e| match e {
            BlenderError::Timeout(_) => Error::Internal(
                "Blender execution timed out. Check BLENDER_PATH configuration.".to_string(),
            ),
            BlenderError::NotFound(path) => Error::Internal(format!(
                "Blender not found at {path}. Please set BLENDER_PATH correctly."
            )),
            BlenderError::Spawn(e) => Error::Internal(format!("Blender smoke test failed: {e}")),
        })?;

    let stl_exists = tokio::fs::metadata(&stl_path).await.is_ok();
    let ok = report.success() && stl_exists;

    Ok(Json(SmokeResponse {
        ok,
        message: if ok {
            "Blender smoke test completed successfully".to_string()
        } else {
            "Blender smoke test failed".to_string()
        },
        exec_mode: None,
        suggestion: None,
        returncode: Some(report.returncode),
        stl_exists: Some(stl_exists),
        stl_path: stl_exists.then(|| stl_path.to_string_lossy().into_owned()),
        blender_path: Some(state.config.blender_path.clone()),
        workdir: Some(workdir.to_string_lossy().into_owned()),
        stdout_tail: report.stdout_tail,
        stderr_tail: report.stderr_tail,
    }))
}
