//! Route definitions for the Jobs domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{blender, jobs};
use super::middleware::JobsState;

/// Create all Jobs domain API routes
pub fn routes() -> Router<JobsState> {
    Router::new()
        .route("/v1/jobs", get(jobs::list_jobs).post(jobs::create_job))
        .route("/v1/jobs/{id}", get(jobs::get_job))
        .route("/v1/blender/smoke", post(blender::blender_smoke))
}
