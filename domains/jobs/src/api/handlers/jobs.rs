//! Job management API handlers
//!
//! `POST /v1/jobs` persists the job as `queued` before returning; pickup is
//! asynchronous via the dispatcher. `GET /v1/jobs/{id}` is the client's
//! polling endpoint.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use meshforge_common::{Error, Result, ValidatedJson};
use validator::Validate;

use crate::api::middleware::JobsState;
use crate::domain::entities::{Job, JobStatus, JobType};

/// Job response DTO
#[derive(Debug, Serialize)]
pub struct JobResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub job_type: JobType,
    pub status: JobStatus,
    pub progress: i32,
    pub params: serde_json::Value,
    pub result: Option<serde_json::Value>,
    pub message: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Job> for JobResponse {
    fn from(j: Job) -> Self {
        Self {
            id: j.id,
            project_id: j.project_id,
            job_type: j.job_type,
            status: j.status,
            progress: j.progress,
            params: j.params.0,
            result: j.result.map(|r| r.0),
            message: j.message,
            started_at: j.started_at,
            completed_at: j.completed_at,
            created_at: j.created_at,
            updated_at: j.updated_at,
        }
    }
}

/// Request for creating a job
///
/// An unknown `job_type` is rejected with 400 at deserialization.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJobRequest {
    pub project_id: Uuid,
    pub job_type: JobType,
    pub params: Option<serde_json::Value>,
}

/// Query parameters for listing jobs
#[derive(Debug, Deserialize)]
pub struct ListJobsParams {
    pub project_id: Option<Uuid>,
    pub status: Option<JobStatus>,
    pub limit: Option<i64>,
}

/// Create a new async job
pub async fn create_job(
    State(state): State<JobsState>,
    ValidatedJson(req): ValidatedJson<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobResponse>)> {
    if !state.projects.exists(req.project_id).await? {
        return Err(Error::NotFound("Project not found".to_string()));
    }

    let params = req
        .params
        .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));
    let job = Job::new(req.project_id, req.job_type, params);
    let created = state.jobs.create(&job).await?;

    tracing::info!(
        job_id = %created.id,
        job_type = %created.job_type,
        project_id = %created.project_id,
        "Job queued"
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// List jobs with optional filters, newest first
pub async fn list_jobs(
    State(state): State<JobsState>,
    Query(params): Query<ListJobsParams>,
) -> Result<Json<Vec<JobResponse>>> {
    let limit = params.limit.unwrap_or(50).clamp(1, 100);

    let jobs = state
        .jobs
        .list(params.project_id, params.status, limit)
        .await?;

    let responses: Vec<JobResponse> = jobs.into_iter().map(Into::into).collect();
    Ok(Json(responses))
}

/// Get job status by ID
pub async fn get_job(
    State(state): State<JobsState>,
    Path(id): Path<Uuid>,
) -> Result<Json<JobResponse>> {
    let job = state
        .jobs
        .find(id)
        .await?
        .ok_or_else(|| Error::NotFound("Job not found".to_string()))?;

    Ok(Json(job.into()))
}
