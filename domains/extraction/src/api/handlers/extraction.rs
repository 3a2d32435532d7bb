//! Extraction API handlers

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::{DateTime, Utc};
use meshforge_common::{Error, Result, ValidatedJson};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::api::middleware::ExtractionState;
use crate::domain::entities::{DimensionItem, ExtractionResult, ScaleReference};

/// Request for setting a project's scale reference
#[derive(Debug, Deserialize, Validate)]
pub struct SetScaleReferenceRequest {
    pub project_id: Uuid,
    /// Reference dimension name (e.g. overall_length_mm)
    #[validate(length(min = 1))]
    pub reference_name: String,
    #[validate(range(exclusive_min = 0.0))]
    pub reference_value: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
}

fn default_unit() -> String {
    "mm".to_string()
}

/// Extraction result response DTO
#[derive(Debug, Serialize)]
pub struct ExtractionResultResponse {
    pub project_id: Uuid,
    pub version: i32,
    pub dimensions: Vec<DimensionItem>,
    pub features: serde_json::Value,
    pub tasks: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ExtractionResult> for ExtractionResultResponse {
    fn from(r: ExtractionResult) -> Self {
        Self {
            project_id: r.project_id,
            version: r.version,
            dimensions: r.dimensions.0,
            features: r.features.0,
            tasks: r.tasks.0,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Set the scale reference (calibration dimension) for a project.
///
/// Replaces any existing reference for the project.
pub async fn set_scale_reference(
    State(state): State<ExtractionState>,
    ValidatedJson(req): ValidatedJson<SetScaleReferenceRequest>,
) -> Result<Json<serde_json::Value>> {
    if !state.projects.exists(req.project_id).await? {
        return Err(Error::NotFound("Project not found".to_string()));
    }

    let reference = ScaleReference::new(
        req.project_id,
        req.reference_name,
        req.reference_value,
        req.unit,
    )?;
    state.scale_references.replace(&reference).await?;

    tracing::info!(
        project_id = %req.project_id,
        reference_name = %reference.reference_name,
        reference_value = reference.reference_value,
        "Scale reference set"
    );
    Ok(Json(json!({"ok": true})))
}

/// Get the latest extraction result for a project
pub async fn get_extraction_result(
    State(state): State<ExtractionState>,
    Path(project_id): Path<Uuid>,
) -> Result<Json<ExtractionResultResponse>> {
    let result = state
        .results
        .latest_for_project(project_id)
        .await?
        .ok_or_else(|| {
            Error::NotFound("No extraction result found. Run extraction first.".to_string())
        })?;

    Ok(Json(result.into()))
}
