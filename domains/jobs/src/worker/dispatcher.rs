//! Background job dispatcher
//!
//! A long-lived tokio task that polls the jobs table every second, claims
//! the oldest queued job via `FOR UPDATE SKIP LOCKED`, and executes its
//! task. Run one dispatcher per worker slot; the claim is atomic so
//! multiple loops (and multiple server instances) never double-dispatch.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

use meshforge_common::Result;

use crate::worker::tasks::{self, WorkerContext};

/// Default polling interval for the dispatcher loop
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

pub struct JobDispatcher {
    ctx: WorkerContext,
    poll_interval: Duration,
}

impl JobDispatcher {
    /// Create a new dispatcher with the default 1-second poll interval
    pub fn new(ctx: WorkerContext) -> Self {
        Self {
            ctx,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Run the dispatcher loop until the cancellation token is triggered
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Job dispatcher started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Job dispatcher shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    match self.run_next().await {
                        // Keep draining while the queue has work
                        Ok(true) => ticker.reset_immediately(),
                        Ok(false) => {}
                        Err(e) => tracing::error!(error = %e, "Dispatch cycle failed"),
                    }
                }
            }
        }
    }

    /// Claim and execute at most one job. Returns whether a job was claimed.
    ///
    /// The claimed entity is always driven to a terminal state through
    /// `Job::succeed` / `Job::fail` and persisted: task errors of any kind
    /// mark the job failed with the error text.
    pub async fn run_next(&self) -> Result<bool> {
        let Some(mut job) = self.ctx.jobs.claim_next().await? else {
            return Ok(false);
        };

        tracing::info!(
            job_id = %job.id,
            job_type = %job.job_type,
            project_id = %job.project_id,
            "Job claimed"
        );

        match tasks::execute(&self.ctx, &job).await {
            Ok(result) => {
                job.succeed(result)?;
                tracing::info!(job_id = %job.id, job_type = %job.job_type, "Job succeeded");
            }
            Err(e) => {
                let message = e.to_string();
                job.fail(message.clone())?;
                tracing::warn!(
                    job_id = %job.id,
                    job_type = %job.job_type,
                    message,
                    "Job failed"
                );
            }
        }
        self.ctx.jobs.finalize(&job).await?;

        Ok(true)
    }
}
