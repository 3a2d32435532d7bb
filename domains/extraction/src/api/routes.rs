//! Route definitions for the Extraction domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::extraction;
use super::middleware::ExtractionState;

/// Create all Extraction domain API routes
pub fn routes() -> Router<ExtractionState> {
    Router::new()
        .route(
            "/v1/extraction/scale-reference",
            post(extraction::set_scale_reference),
        )
        .route(
            "/v1/extraction/result/{project_id}",
            get(extraction::get_extraction_result),
        )
}
