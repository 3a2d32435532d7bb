//! Worker runtime integration tests
//!
//! Drives jobs from a queued row through claim, task execution, and the
//! terminal write, asserting the status/progress/result/message contract
//! the polling client sees. Each test gets an isolated database; Blender
//! runs go through the programmable mock backend.

mod common;

use serde_json::json;
use sqlx::PgPool;

use meshforge_blender::mock::MockOutcome;
use meshforge_common::BlenderExecMode;
use meshforge_jobs::{JobStatus, JobType};
use meshforge_scripts::ScriptVersion;

use common::TestWorker;

#[sqlx::test(migrations = "../../migrations")]
async fn test_empty_queue_claims_nothing(pool: PgPool) {
    let worker = TestWorker::new(pool);
    assert!(!worker.dispatcher.run_next().await.unwrap());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_extract_without_scale_reference_fails(pool: PgPool) {
    let worker = TestWorker::new(pool);
    let project = worker.create_project("bracket").await.unwrap();
    let job = worker
        .enqueue(project.id, JobType::Extract, json!({}))
        .await
        .unwrap();

    worker.drain().await.unwrap();

    let job = worker.job(job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(
        job.message.as_deref(),
        Some("Scale reference not set. Please set reference dimension first.")
    );
    assert!(job.result.is_none());
    assert!(job.started_at.is_some());
    assert!(job.completed_at.is_some());
    // The checkpoint written before the rejection survives the terminal write
    assert_eq!(job.progress, 10);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_extract_with_scale_reference_succeeds(pool: PgPool) {
    let worker = TestWorker::new(pool);
    let project = worker.create_project("bracket").await.unwrap();
    worker.set_scale_reference(project.id, 120.0).await.unwrap();
    let job = worker
        .enqueue(project.id, JobType::Extract, json!({}))
        .await
        .unwrap();

    worker.drain().await.unwrap();

    let job = worker.job(job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::Succeeded);
    assert_eq!(job.progress, 100);
    assert!(job.message.is_none());
    assert!(job.completed_at.is_some());

    let result = job.result.expect("succeeded job carries a result").0;
    assert_eq!(result["version"], json!(1));
    assert_eq!(result["dimensions_count"], json!(4));

    let extraction = worker
        .ctx
        .extraction_results
        .latest_for_project(project.id)
        .await
        .unwrap()
        .expect("extraction result row");
    assert_eq!(extraction.version, 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_generate_script_without_extraction_fails(pool: PgPool) {
    let worker = TestWorker::new(pool);
    let project = worker.create_project("bracket").await.unwrap();
    let job = worker
        .enqueue(project.id, JobType::GenerateScript, json!({}))
        .await
        .unwrap();

    worker.drain().await.unwrap();

    let job = worker.job(job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(
        job.message.as_deref(),
        Some("No extraction result found. Run extraction first.")
    );
    assert!(job.result.is_none());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_generate_script_after_extraction_succeeds(pool: PgPool) {
    let worker = TestWorker::new(pool);
    let project = worker.create_project("bracket").await.unwrap();
    worker.set_scale_reference(project.id, 120.0).await.unwrap();

    worker
        .enqueue(project.id, JobType::Extract, json!({}))
        .await
        .unwrap();
    worker.drain().await.unwrap();

    let job = worker
        .enqueue(project.id, JobType::GenerateScript, json!({"thickness": 6.0}))
        .await
        .unwrap();
    worker.drain().await.unwrap();

    let job = worker.job(job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::Succeeded);

    let result = job.result.expect("succeeded job carries a result").0;
    assert_eq!(result["version"], json!(1));

    let script = worker
        .ctx
        .scripts
        .latest_for_project(project.id)
        .await
        .unwrap()
        .expect("script version row");
    assert_eq!(script.version, 1);
    assert_eq!(result["script_length"], json!(script.script_text.len()));
    assert!(script
        .script_text
        .contains(&format!("output_{}.stl", project.id)));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_run_blender_without_script_fails(pool: PgPool) {
    let worker = TestWorker::new(pool);
    let project = worker.create_project("bracket").await.unwrap();
    let job = worker
        .enqueue(project.id, JobType::RunBlender, json!({}))
        .await
        .unwrap();

    worker.drain().await.unwrap();

    let job = worker.job(job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(
        job.message.as_deref(),
        Some("No script found. Generate script first.")
    );
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_run_blender_rejected_in_local_only_mode(pool: PgPool) {
    let worker = TestWorker::with_exec_mode(pool, BlenderExecMode::LocalOnly);
    let project = worker.create_project("bracket").await.unwrap();
    let job = worker
        .enqueue(project.id, JobType::RunBlender, json!({}))
        .await
        .unwrap();

    worker.drain().await.unwrap();

    let job = worker.job(job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(
        job.message.as_deref(),
        Some("Blender execution mode is 'local_only', not 'server_headless'")
    );
    // Rejected before the backend is ever invoked
    assert!(worker.blender.history().is_empty());
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_run_blender_nonzero_exit_fails(pool: PgPool) {
    let worker = TestWorker::new(pool);
    let project = worker.create_project("bracket").await.unwrap();
    let script = ScriptVersion::new(project.id, 1, "import bpy".to_string()).unwrap();
    worker.ctx.scripts.create(&script).await.unwrap();
    worker.blender.set_outcome(MockOutcome::Fail(11));

    let job = worker
        .enqueue(project.id, JobType::RunBlender, json!({}))
        .await
        .unwrap();
    worker.drain().await.unwrap();

    let job = worker.job(job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::Failed);
    assert_eq!(
        job.message.as_deref(),
        Some("Blender failed with return code 11")
    );
    assert!(job.result.is_none());
    assert_eq!(worker.blender.history().len(), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_run_blender_success_registers_output_assets(pool: PgPool) {
    let worker = TestWorker::new(pool);
    let project = worker.create_project("bracket").await.unwrap();
    let script = ScriptVersion::new(project.id, 1, "import bpy".to_string()).unwrap();
    worker.ctx.scripts.create(&script).await.unwrap();
    worker.blender.set_output_files(vec![
        format!("output_{}.stl", project.id),
        format!("render_{}.png", project.id),
    ]);

    let job = worker
        .enqueue(project.id, JobType::RunBlender, json!({}))
        .await
        .unwrap();
    worker.drain().await.unwrap();

    let job = worker.job(job.id).await.unwrap();
    assert_eq!(job.status, JobStatus::Succeeded);
    assert_eq!(job.progress, 100);

    let result = job.result.expect("succeeded job carries a result").0;
    assert_eq!(result["returncode"], json!(0));
    assert!(result["result_asset_id"].is_string());
    assert!(result["render_asset_id"].is_string());

    // Script was written into the per-project workdir before the run
    let recorded = &worker.blender.history()[0];
    assert_eq!(recorded.workdir, worker.project_workdir(project.id));
    assert_eq!(recorded.script_path, recorded.workdir.join("script_v1.py"));

    let assets = worker.ctx.assets.list(Some(project.id), 50, 0).await.unwrap();
    assert_eq!(assets.len(), 2);
    assert!(assets.iter().any(|a| a.content_type == "model/stl"));
    assert!(assets.iter().any(|a| a.content_type == "image/png"));
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_terminal_jobs_are_not_reclaimed(pool: PgPool) {
    let worker = TestWorker::new(pool);
    let project = worker.create_project("bracket").await.unwrap();
    let job = worker
        .enqueue(project.id, JobType::Extract, json!({}))
        .await
        .unwrap();

    worker.drain().await.unwrap();
    let failed = worker.job(job.id).await.unwrap();
    assert_eq!(failed.status, JobStatus::Failed);

    // Another cycle finds nothing to claim and changes nothing
    assert!(!worker.dispatcher.run_next().await.unwrap());
    let after = worker.job(job.id).await.unwrap();
    assert_eq!(after.status, JobStatus::Failed);
    assert_eq!(after.completed_at, failed.completed_at);
}

#[sqlx::test(migrations = "../../migrations")]
async fn test_jobs_are_claimed_oldest_first(pool: PgPool) {
    let worker = TestWorker::new(pool);
    let project = worker.create_project("bracket").await.unwrap();
    worker.set_scale_reference(project.id, 120.0).await.unwrap();

    let first = worker
        .enqueue(project.id, JobType::Extract, json!({}))
        .await
        .unwrap();
    let second = worker
        .enqueue(project.id, JobType::Extract, json!({}))
        .await
        .unwrap();

    assert!(worker.dispatcher.run_next().await.unwrap());
    assert_eq!(
        worker.job(first.id).await.unwrap().status,
        JobStatus::Succeeded
    );
    assert_eq!(
        worker.job(second.id).await.unwrap().status,
        JobStatus::Queued
    );
}
