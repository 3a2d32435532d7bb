//! Shared fixtures for worker runtime integration tests
//!
//! Builds a `WorkerContext` over an isolated test database with a
//! programmable `MockBlender` backend and a throwaway work directory.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use sqlx::PgPool;
use tempfile::TempDir;
use uuid::Uuid;

use meshforge_assets::AssetRepository;
use meshforge_blender::mock::MockBlender;
use meshforge_common::{BlenderExecMode, Config};
use meshforge_extraction::{ExtractionResultRepository, ScaleReference, ScaleReferenceRepository};
use meshforge_jobs::{Job, JobDispatcher, JobRepository, JobType, WorkerContext};
use meshforge_projects::{Project, ProjectRepository};
use meshforge_scripts::ScriptVersionRepository;

/// A worker runtime wired against the test database.
pub struct TestWorker {
    pub ctx: WorkerContext,
    pub dispatcher: JobDispatcher,
    /// Handle to the mock backend inside `ctx` (clones share state).
    pub blender: MockBlender,
    pub projects: ProjectRepository,
    _workdir: TempDir,
}

impl TestWorker {
    pub fn new(pool: PgPool) -> Self {
        Self::with_exec_mode(pool, BlenderExecMode::ServerHeadless)
    }

    pub fn with_exec_mode(pool: PgPool, mode: BlenderExecMode) -> Self {
        let workdir = tempfile::tempdir().expect("failed to create temp workdir");
        let path_str = |name: &str| workdir.path().join(name).to_string_lossy().into_owned();

        let config = Config {
            database_url: String::new(),
            upload_dir: path_str("uploads"),
            output_dir: path_str("outputs"),
            blender_exec_mode: mode,
            blender_path: "/usr/bin/blender".to_string(),
            blender_workdir: path_str("blender"),
            blender_timeout_secs: 30,
            worker_count: 1,
            cors_origins: String::new(),
            port: 0,
        };

        let blender = MockBlender::new();
        let ctx = WorkerContext {
            jobs: JobRepository::new(pool.clone()),
            scale_references: ScaleReferenceRepository::new(pool.clone()),
            extraction_results: ExtractionResultRepository::new(pool.clone()),
            scripts: ScriptVersionRepository::new(pool.clone()),
            assets: AssetRepository::new(pool.clone()),
            blender: Arc::new(blender.clone()),
            config,
        };

        TestWorker {
            dispatcher: JobDispatcher::new(ctx.clone()),
            blender,
            projects: ProjectRepository::new(pool),
            ctx,
            _workdir: workdir,
        }
    }

    pub async fn create_project(&self, name: &str) -> Result<Project> {
        let project = Project::new(name.to_string(), None)?;
        Ok(self.projects.create(&project).await?)
    }

    pub async fn set_scale_reference(
        &self,
        project_id: Uuid,
        value: f64,
    ) -> Result<ScaleReference> {
        let reference = ScaleReference::new(
            project_id,
            "overall_length_mm".to_string(),
            value,
            "mm".to_string(),
        )?;
        Ok(self.ctx.scale_references.replace(&reference).await?)
    }

    pub async fn enqueue(
        &self,
        project_id: Uuid,
        job_type: JobType,
        params: serde_json::Value,
    ) -> Result<Job> {
        let job = Job::new(project_id, job_type, params);
        Ok(self.ctx.jobs.create(&job).await?)
    }

    /// Run dispatcher cycles until the queue is drained.
    pub async fn drain(&self) -> Result<()> {
        while self.dispatcher.run_next().await? {}
        Ok(())
    }

    pub async fn job(&self, id: Uuid) -> Result<Job> {
        Ok(self
            .ctx
            .jobs
            .find(id)
            .await?
            .expect("job row should exist"))
    }

    /// Per-project Blender work directory, as the worker resolves it.
    pub fn project_workdir(&self, project_id: Uuid) -> PathBuf {
        PathBuf::from(&self.ctx.config.blender_workdir).join(project_id.to_string())
    }
}
