//! Meshforge application composition root
//!
//! Composes all domain routers into a single application and wires up the
//! worker context shared by the job dispatcher loops.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::PgPool;

use meshforge_assets::{AssetRepository, AssetsState};
use meshforge_blender::{BlenderRunner, HeadlessBlender};
use meshforge_common::{Config, Storage};
use meshforge_extraction::{
    ExtractionResultRepository, ExtractionState, ScaleReferenceRepository,
};
use meshforge_jobs::{JobRepository, JobsState, WorkerContext};
use meshforge_projects::{ProjectRepository, ProjectsState};
use meshforge_scripts::{ScriptVersionRepository, ScriptsState};

/// Create the main application router plus the worker context for the
/// job dispatcher loops
pub fn create_app(config: Config, pool: PgPool) -> (Router, WorkerContext) {
    let projects = ProjectRepository::new(pool.clone());
    let assets = AssetRepository::new(pool.clone());
    let scale_references = ScaleReferenceRepository::new(pool.clone());
    let extraction_results = ExtractionResultRepository::new(pool.clone());
    let scripts = ScriptVersionRepository::new(pool.clone());
    let jobs = JobRepository::new(pool);

    let storage = Storage::new(&config.upload_dir, &config.output_dir);
    let blender: Arc<dyn BlenderRunner> = Arc::new(HeadlessBlender::new(
        &config.blender_path,
        Duration::from_secs(config.blender_timeout_secs),
    ));

    let projects_state = ProjectsState {
        projects: projects.clone(),
    };
    let assets_state = AssetsState {
        assets: assets.clone(),
        projects: projects.clone(),
        storage,
    };
    let extraction_state = ExtractionState {
        scale_references: scale_references.clone(),
        results: extraction_results.clone(),
        projects: projects.clone(),
    };
    let scripts_state = ScriptsState {
        scripts: scripts.clone(),
    };
    let jobs_state = JobsState {
        jobs: jobs.clone(),
        projects: projects.clone(),
        blender: blender.clone(),
        config: config.clone(),
    };

    let worker_ctx = WorkerContext {
        jobs,
        scale_references,
        extraction_results,
        scripts,
        assets,
        blender,
        config,
    };

    let app = Router::new()
        .route("/health", axum::routing::get(health_check))
        .route(
            "/",
            axum::routing::get(|| async { "Meshforge API v0.1.0" }),
        )
        .merge(meshforge_projects::routes().with_state(projects_state))
        .merge(meshforge_assets::routes().with_state(assets_state))
        .merge(meshforge_extraction::routes().with_state(extraction_state))
        .merge(meshforge_scripts::routes().with_state(scripts_state))
        .merge(meshforge_jobs::routes().with_state(jobs_state));

    (app, worker_ctx)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
