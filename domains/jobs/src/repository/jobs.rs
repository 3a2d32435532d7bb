//! Job repository
//!
//! Besides CRUD, this repository is the queue itself: `claim_next` atomically
//! picks up the oldest queued job with `FOR UPDATE SKIP LOCKED`, so multiple
//! dispatcher loops (or server instances) never double-claim a job.

use crate::domain::entities::{Job, JobStatus};
use meshforge_common::Result;
use sqlx::PgPool;
use uuid::Uuid;

const JOB_COLUMNS: &str = "id, project_id, job_type, status, progress, params, result, \
     message, started_at, completed_at, created_at, updated_at";

#[derive(Clone)]
pub struct JobRepository {
    pool: PgPool,
}

impl JobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find job by ID
    pub async fn find(&self, id: Uuid) -> Result<Option<Job>> {
        let query = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = $1");
        let job = sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(job)
    }

    /// List jobs with optional filters, newest first
    pub async fn list(
        &self,
        project_id: Option<Uuid>,
        status: Option<JobStatus>,
        limit: i64,
    ) -> Result<Vec<Job>> {
        let mut builder = sqlx::QueryBuilder::new(format!(
            "SELECT {JOB_COLUMNS} FROM jobs WHERE TRUE"
        ));

        if let Some(project_id) = project_id {
            builder.push(" AND project_id = ").push_bind(project_id);
        }
        if let Some(status) = status {
            builder.push(" AND status = ").push_bind(status);
        }
        builder.push(" ORDER BY created_at DESC LIMIT ").push_bind(limit);

        let jobs = builder
            .build_query_as::<Job>()
            .fetch_all(&self.pool)
            .await?;
        Ok(jobs)
    }

    /// Create a new job
    pub async fn create(&self, job: &Job) -> Result<Job> {
        let query = format!(
            "INSERT INTO jobs ({JOB_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {JOB_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Job>(&query)
            .bind(job.id)
            .bind(job.project_id)
            .bind(job.job_type)
            .bind(job.status)
            .bind(job.progress)
            .bind(&job.params)
            .bind(&job.result)
            .bind(&job.message)
            .bind(job.started_at)
            .bind(job.completed_at)
            .bind(job.created_at)
            .bind(job.updated_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    /// Atomically claim the oldest queued job, marking it running.
    ///
    /// Returns `None` when the queue is empty. The row is locked with
    /// `SKIP LOCKED` so concurrent claimers pass over rows already being
    /// claimed, then the pickup transition runs through `Job::start` and the
    /// entity fields are written back inside the same transaction.
    pub async fn claim_next(&self) -> Result<Option<Job>> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "SELECT {JOB_COLUMNS} FROM jobs \
             WHERE status = $1 \
             ORDER BY created_at ASC \
             LIMIT 1 \
             FOR UPDATE SKIP LOCKED"
        );
        let Some(mut job) = sqlx::query_as::<_, Job>(&query)
            .bind(JobStatus::Queued)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        job.start()?;
        sqlx::query(
            "UPDATE jobs SET status = $2, started_at = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(job.id)
        .bind(job.status)
        .bind(job.started_at)
        .bind(job.updated_at)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(Some(job))
    }

    /// Record a progress checkpoint. `GREATEST` keeps progress monotonic even
    /// if checkpoints race.
    pub async fn update_progress(&self, id: Uuid, progress: i32) -> Result<()> {
        sqlx::query(
            "UPDATE jobs SET progress = GREATEST(progress, $2), updated_at = NOW() \
             WHERE id = $1 AND status = $3",
        )
        .bind(id)
        .bind(progress.clamp(0, 100))
        .bind(JobStatus::Running)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Persist a job the entity has driven to a terminal state via
    /// `Job::succeed` or `Job::fail`.
    ///
    /// Invariants are checked with `Job::validate` before the write. The
    /// update is guarded on non-terminal status so it can never overwrite a
    /// row another writer already completed, and `GREATEST` keeps checkpoint
    /// progress recorded after the claim.
    pub async fn finalize(&self, job: &Job) -> Result<()> {
        if !job.is_terminal() {
            return Err(meshforge_common::Error::Validation(
                "Only terminal jobs can be finalized".to_string(),
            ));
        }
        job.validate()?;

        sqlx::query(
            "UPDATE jobs \
             SET status = $2, progress = GREATEST(progress, $3), result = $4, \
                 message = $5, completed_at = $6, updated_at = $7 \
             WHERE id = $1 AND status IN ($8, $9)",
        )
        .bind(job.id)
        .bind(job.status)
        .bind(job.progress)
        .bind(&job.result)
        .bind(&job.message)
        .bind(job.completed_at)
        .bind(job.updated_at)
        .bind(JobStatus::Queued)
        .bind(JobStatus::Running)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
