//! Route definitions for the Assets domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::assets;
use super::middleware::AssetsState;

/// Create all Assets domain API routes
pub fn routes() -> Router<AssetsState> {
    Router::new()
        .route("/v1/assets", get(assets::list_assets))
        .route("/v1/assets/upload", post(assets::upload_assets))
        .route("/v1/assets/{id}", get(assets::get_asset))
        .route("/v1/assets/{id}/download", get(assets::download_asset))
        .route("/v1/assets/{id}/preview", get(assets::preview_asset))
}
