//! Route definitions for the Scripts domain API

use axum::{routing::get, Router};

use super::handlers::scripts;
use super::middleware::ScriptsState;

/// Create all Scripts domain API routes.
///
/// `{id}` is a project ID for the list and latest routes, and a script ID
/// for the download route.
pub fn routes() -> Router<ScriptsState> {
    Router::new()
        .route("/v1/scripts/{id}", get(scripts::list_scripts))
        .route("/v1/scripts/{id}/latest", get(scripts::get_latest_script))
        .route("/v1/scripts/{id}/download", get(scripts::download_script))
}
