//! Worker task implementations
//!
//! One function per job type. Each task reads its inputs from the sibling
//! domains, writes progress checkpoints to the job row, and returns the
//! result payload for the succeeded job. Domain-level rejections (missing
//! scale reference, wrong exec mode, Blender failure) are `TaskError::Failed`
//! and carry the user-facing message stored on the failed job.

use std::path::PathBuf;
use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use meshforge_assets::{Asset, AssetRepository, AssetType};
use meshforge_blender::BlenderRunner;
use meshforge_common::{BlenderExecMode, Config, Error};
use meshforge_extraction::{
    DimensionItem, ExtractionResult, ExtractionResultRepository, ScaleReference,
    ScaleReferenceRepository,
};
use meshforge_scripts::{ScriptVersion, ScriptVersionRepository};

use crate::domain::entities::{Job, JobType};
use crate::repository::JobRepository;
use crate::worker::script::{build_blender_script, script_params_from};

/// Why a task did not produce a result
#[derive(Debug, Error)]
pub enum TaskError {
    /// Domain-level failure; the message is stored on the failed job
    #[error("{0}")]
    Failed(String),

    /// Infrastructure error (database, filesystem); also fails the job,
    /// with the error text as the message
    #[error(transparent)]
    Internal(#[from] Error),
}

/// Everything a worker needs to execute tasks
#[derive(Clone)]
pub struct WorkerContext {
    pub jobs: JobRepository,
    pub scale_references: ScaleReferenceRepository,
    pub extraction_results: ExtractionResultRepository,
    pub scripts: ScriptVersionRepository,
    pub assets: AssetRepository,
    pub blender: Arc<dyn BlenderRunner>,
    pub config: Config,
}

/// Execute the task for a claimed job, returning the result payload
pub async fn execute(ctx: &WorkerContext, job: &Job) -> Result<serde_json::Value, TaskError> {
    match job.job_type {
        JobType::Extract => run_extraction(ctx, job).await,
        JobType::GenerateScript => generate_script(ctx, job).await,
        JobType::RunBlender => run_blender(ctx, job).await,
    }
}

/// `extract`: derive a dimension set from the project's scale reference and
/// persist it as a new `ExtractionResult` version
async fn run_extraction(ctx: &WorkerContext, job: &Job) -> Result<serde_json::Value, TaskError> {
    ctx.jobs.update_progress(job.id, 10).await?;

    let reference = ctx
        .scale_references
        .find_by_project(job.project_id)
        .await?
        .ok_or_else(|| {
            TaskError::Failed(
                "Scale reference not set. Please set reference dimension first.".to_string(),
            )
        })?;

    let dimensions = estimate_dimensions(&reference);
    ctx.jobs.update_progress(job.id, 50).await?;

    let ref_value = reference.reference_value;
    let features = json!([
        {"type": "base_plate", "shape": "rectangular"},
        {"type": "through_hole", "count": 8, "pattern": "circular"},
        {"type": "corner_fillet", "radius": ref_value * 0.02},
    ]);
    let tasks = vec![
        "Create base plate with extracted dimensions".to_string(),
        "Add through holes in circular pattern".to_string(),
        "Apply corner fillets".to_string(),
        "Export to STL format".to_string(),
    ];

    let version = ctx.extraction_results.next_version(job.project_id).await?;
    let dimensions_count = dimensions.len();
    let result =
        ExtractionResult::new(job.project_id, version, dimensions, features, tasks)?;
    let created = ctx.extraction_results.create(&result).await?;

    Ok(json!({
        "extraction_result_id": created.id,
        "version": version,
        "dimensions_count": dimensions_count,
    }))
}

/// Ratio-estimated dimensions derived from the user-supplied reference.
///
/// TODO: replace with actual drawing parsing (edge detection, OCR) once the
/// extraction pipeline lands.
fn estimate_dimensions(reference: &ScaleReference) -> Vec<DimensionItem> {
    let ref_value = reference.reference_value;
    let unit = reference.unit.clone();

    vec![
        DimensionItem {
            name: reference.reference_name.clone(),
            value: ref_value,
            unit: unit.clone(),
            confidence: 0.95,
            source: "user_reference".to_string(),
        },
        DimensionItem {
            name: "overall_width".to_string(),
            value: round3(ref_value * 0.45),
            unit: unit.clone(),
            confidence: 0.55,
            source: "ratio_estimation".to_string(),
        },
        DimensionItem {
            name: "overall_height".to_string(),
            value: round3(ref_value * 0.08),
            unit: unit.clone(),
            confidence: 0.60,
            source: "ratio_estimation".to_string(),
        },
        DimensionItem {
            name: "hole_diameter".to_string(),
            value: round3(ref_value * 0.08),
            unit,
            confidence: 0.50,
            source: "ratio_estimation".to_string(),
        },
    ]
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// `generate_script`: render the parametric Blender script from the latest
/// extraction result and persist it as a new `ScriptVersion`
async fn generate_script(ctx: &WorkerContext, job: &Job) -> Result<serde_json::Value, TaskError> {
    ctx.jobs.update_progress(job.id, 10).await?;

    let extraction = ctx
        .extraction_results
        .latest_for_project(job.project_id)
        .await?
        .ok_or_else(|| {
            TaskError::Failed("No extraction result found. Run extraction first.".to_string())
        })?;

    let params = script_params_from(&extraction, &job.params.0);
    ctx.jobs.update_progress(job.id, 40).await?;

    let script_text = build_blender_script(job.project_id, &params);
    let script_length = script_text.len();

    let version = ctx.scripts.next_version(job.project_id).await?;
    let script = ScriptVersion::new(job.project_id, version, script_text)?;
    let created = ctx.scripts.create(&script).await?;

    Ok(json!({
        "script_id": created.id,
        "version": version,
        "script_length": script_length,
    }))
}

/// `run_blender`: execute the latest script headless and register the
/// exported STL (and render PNG, if produced) as project assets
async fn run_blender(ctx: &WorkerContext, job: &Job) -> Result<serde_json::Value, TaskError> {
    ctx.jobs.update_progress(job.id, 10).await?;

    let mode = ctx.config.blender_exec_mode;
    if mode != BlenderExecMode::ServerHeadless {
        return Err(TaskError::Failed(format!(
            "Blender execution mode is '{}', not 'server_headless'",
            mode.as_str()
        )));
    }

    let script = ctx
        .scripts
        .latest_for_project(job.project_id)
        .await?
        .ok_or_else(|| {
            TaskError::Failed("No script found. Generate script first.".to_string())
        })?;

    let workdir = PathBuf::from(&ctx.config.blender_workdir).join(job.project_id.to_string());
    tokio::fs::create_dir_all(&workdir)
        .await
        .map_err(Error::from)?;

    let script_path = workdir.join(format!("script_v{}.py", script.version));
    tokio::fs::write(&script_path, &script.script_text)
        .await
        .map_err(Error::from)?;

    ctx.jobs.update_progress(job.id, 30).await?;

    let report = ctx
        .blender
        .run_script(&script_path, &workdir)
        .await
        .map_err(|e| TaskError::Failed(e.to_string()))?;

    ctx.jobs.update_progress(job.id, 80).await?;

    let output_file = workdir.join(format!("output_{}.stl", job.project_id));
    let render_file = workdir.join(format!("render_{}.png", job.project_id));

    let output_meta = tokio::fs::metadata(&output_file).await.ok();
    if !report.success() || output_meta.is_none() {
        return Err(TaskError::Failed(format!(
            "Blender failed with return code {}",
            report.returncode
        )));
    }

    let result_asset = register_output_asset(
        ctx,
        job.project_id,
        AssetType::Model3d,
        "model/stl",
        &output_file,
        output_meta.map(|m| m.len() as i64).unwrap_or(0),
    )
    .await?;

    let mut render_path = None;
    let mut render_asset_id = None;
    if let Ok(meta) = tokio::fs::metadata(&render_file).await {
        let render_asset = register_output_asset(
            ctx,
            job.project_id,
            AssetType::Image,
            "image/png",
            &render_file,
            meta.len() as i64,
        )
        .await?;
        render_path = Some(render_file.to_string_lossy().into_owned());
        render_asset_id = Some(render_asset.id);
    }

    Ok(json!({
        "returncode": report.returncode,
        "output_file": output_file.to_string_lossy(),
        "render_file": render_path,
        "result_asset_id": result_asset.id,
        "render_asset_id": render_asset_id,
        "stdout": report.stdout_tail,
        "stderr": report.stderr_tail,
    }))
}

async fn register_output_asset(
    ctx: &WorkerContext,
    project_id: Uuid,
    asset_type: AssetType,
    content_type: &str,
    path: &std::path::Path,
    size_bytes: i64,
) -> Result<Asset, TaskError> {
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let asset = Asset::new(
        project_id,
        asset_type,
        filename,
        content_type.to_string(),
        size_bytes,
        path.to_string_lossy().into_owned(),
    )?;
    Ok(ctx.assets.create(&asset).await?)
}
