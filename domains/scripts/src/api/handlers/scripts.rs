//! Script version API handlers

use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, HeaderValue},
    response::Response,
    Json,
};
use chrono::{DateTime, Utc};
use meshforge_common::{Error, Result};
use serde::Serialize;
use uuid::Uuid;

use crate::api::middleware::ScriptsState;
use crate::domain::entities::ScriptVersion;

/// Script version metadata DTO (no script text)
#[derive(Debug, Serialize)]
pub struct ScriptVersionResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub script_length: usize,
}

impl From<&ScriptVersion> for ScriptVersionResponse {
    fn from(s: &ScriptVersion) -> Self {
        Self {
            id: s.id,
            project_id: s.project_id,
            version: s.version,
            created_at: s.created_at,
            script_length: s.script_text.len(),
        }
    }
}

/// Script list response DTO
#[derive(Debug, Serialize)]
pub struct ScriptListResponse {
    pub project_id: Uuid,
    pub versions: Vec<ScriptVersionResponse>,
}

/// List all script versions for a project
pub async fn list_scripts(
    State(state): State<ScriptsState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ScriptListResponse>> {
    let scripts = state.scripts.list_for_project(project_id).await?;

    Ok(Json(ScriptListResponse {
        project_id,
        versions: scripts.iter().map(Into::into).collect(),
    }))
}

/// Get the latest script text for a project
pub async fn get_latest_script(
    State(state): State<ScriptsState>,
    Path(project_id): Path<Uuid>,
) -> Result<Response> {
    let script = state
        .scripts
        .latest_for_project(project_id)
        .await?
        .ok_or_else(|| Error::NotFound("No script found".to_string()))?;

    plain_python_response(script.script_text, None)
}

/// Download a script version by script ID
pub async fn download_script(
    State(state): State<ScriptsState>,
    Path(script_id): Path<Uuid>,
) -> Result<Response> {
    let script = state
        .scripts
        .find(script_id)
        .await?
        .ok_or_else(|| Error::NotFound("Script not found".to_string()))?;

    let filename = script.download_filename();
    plain_python_response(script.script_text, Some(&filename))
}

fn plain_python_response(text: String, attachment_name: Option<&str>) -> Result<Response> {
    let mut response = Response::new(Body::from(text));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/x-python"),
    );
    if let Some(name) = attachment_name {
        response.headers_mut().insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&format!("attachment; filename=\"{name}\""))
                .map_err(|_| Error::Internal("Invalid script filename".to_string()))?,
        );
    }
    Ok(response)
}
