//! Job domain entities
//!
//! A job is an asynchronous unit of work against a project: dimension
//! extraction, script generation, or a headless Blender run. Clients poll
//! the job row for status and progress until it reaches a terminal state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

use meshforge_common::{Error, Result};

use crate::domain::state::{JobEvent, JobState, JobStateMachine, StateError};

/// Kind of work a job performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "job_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Extract,
    GenerateScript,
    RunBlender,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Extract => "extract",
            Self::GenerateScript => "generate_script",
            Self::RunBlender => "run_blender",
        }
    }
}

impl std::fmt::Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Job status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, Default)]
#[sqlx(type_name = "job_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl JobStatus {
    /// Check if status is terminal (job has finished)
    pub fn is_terminal(&self) -> bool {
        self.to_state().is_terminal()
    }

    /// Convert to state machine state
    pub fn to_state(&self) -> JobState {
        match self {
            JobStatus::Queued => JobState::Queued,
            JobStatus::Running => JobState::Running,
            JobStatus::Succeeded => JobState::Succeeded,
            JobStatus::Failed => JobState::Failed,
        }
    }

    /// Create from state machine state
    pub fn from_state(state: JobState) -> Self {
        match state {
            JobState::Queued => JobStatus::Queued,
            JobState::Running => JobStatus::Running,
            JobState::Succeeded => JobStatus::Succeeded,
            JobState::Failed => JobStatus::Failed,
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.to_state().fmt(f)
    }
}

/// Job entity
///
/// `result` is set iff the job succeeded; `message` is set iff it failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Job {
    pub id: Uuid,
    pub project_id: Uuid,
    pub job_type: JobType,
    pub status: JobStatus,
    pub progress: i32,
    pub params: Json<serde_json::Value>,
    pub result: Option<Json<serde_json::Value>>,
    pub message: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    /// Create a new queued job
    pub fn new(project_id: Uuid, job_type: JobType, params: serde_json::Value) -> Self {
        let now = Utc::now();
        Job {
            id: Uuid::new_v4(),
            project_id,
            job_type,
            status: JobStatus::default(),
            progress: 0,
            params: Json(params),
            result: None,
            message: None,
            started_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if job is terminal
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Start job execution (worker pickup)
    pub fn start(&mut self) -> Result<()> {
        let new_state = self.apply_transition(JobEvent::WorkerPicksUp)?;
        self.status = JobStatus::from_state(new_state);
        self.started_at = Some(Utc::now());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Complete job successfully with a result payload
    pub fn succeed(&mut self, result: serde_json::Value) -> Result<()> {
        let new_state = self.apply_transition(JobEvent::Success)?;
        self.status = JobStatus::from_state(new_state);
        self.progress = 100;
        self.result = Some(Json(result));
        self.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Fail job with a message
    pub fn fail(&mut self, message: impl Into<String>) -> Result<()> {
        let new_state = self.apply_transition(JobEvent::Failure)?;
        self.status = JobStatus::from_state(new_state);
        self.message = Some(message.into());
        self.completed_at = Some(Utc::now());
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Advance progress. Clamped to [0, 100] and never decreasing.
    pub fn update_progress(&mut self, percent: i32) {
        self.progress = percent.clamp(0, 100).max(self.progress);
        self.updated_at = Utc::now();
    }

    /// Apply a state transition using the state machine
    fn apply_transition(&self, event: JobEvent) -> Result<JobState> {
        let current_state = self.status.to_state();
        JobStateMachine::transition(current_state, event).map_err(|e| match e {
            StateError::InvalidTransition { from, event } => Error::Validation(format!(
                "Invalid job transition: cannot apply '{event}' event from '{from}' state"
            )),
            StateError::TerminalState(state) => Error::Validation(format!(
                "Job is in terminal state '{state}' and cannot transition"
            )),
        })
    }

    /// Validate invariants
    pub fn validate(&self) -> Result<()> {
        if !(0..=100).contains(&self.progress) {
            return Err(Error::Validation(
                "Job progress must be between 0 and 100".to_string(),
            ));
        }

        // result is set iff succeeded
        match (&self.status, &self.result) {
            (JobStatus::Succeeded, None) => {
                return Err(Error::Validation(
                    "Succeeded jobs must have a result".to_string(),
                ));
            }
            (JobStatus::Queued | JobStatus::Running | JobStatus::Failed, Some(_)) => {
                return Err(Error::Validation(
                    "Only succeeded jobs may carry a result".to_string(),
                ));
            }
            _ => {}
        }

        // message is set iff failed
        match (&self.status, &self.message) {
            (JobStatus::Failed, None) => {
                return Err(Error::Validation(
                    "Failed jobs must have a message".to_string(),
                ));
            }
            (JobStatus::Queued | JobStatus::Running | JobStatus::Succeeded, Some(_)) => {
                return Err(Error::Validation(
                    "Only failed jobs may carry a message".to_string(),
                ));
            }
            _ => {}
        }

        if self.status == JobStatus::Succeeded && self.progress != 100 {
            return Err(Error::Validation(
                "Succeeded jobs must report 100% progress".to_string(),
            ));
        }

        if self.status == JobStatus::Running && self.started_at.is_none() {
            return Err(Error::Validation(
                "Running jobs must have a start timestamp".to_string(),
            ));
        }

        if self.is_terminal() && self.completed_at.is_none() {
            return Err(Error::Validation(
                "Terminal jobs must have a completion timestamp".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job(job_type: JobType) -> Job {
        Job::new(Uuid::new_v4(), job_type, json!({}))
    }

    #[test]
    fn test_job_creation() {
        let project_id = Uuid::new_v4();
        let j = Job::new(project_id, JobType::Extract, json!({"hole_count": 6}));

        assert_eq!(j.project_id, project_id);
        assert_eq!(j.status, JobStatus::Queued);
        assert_eq!(j.progress, 0);
        assert!(j.result.is_none());
        assert!(j.message.is_none());
        assert!(!j.is_terminal());
        assert!(j.validate().is_ok());
    }

    #[test]
    fn test_job_success_path() {
        let mut j = job(JobType::Extract);

        j.start().unwrap();
        assert_eq!(j.status, JobStatus::Running);
        assert!(j.started_at.is_some());
        assert!(j.validate().is_ok());

        j.update_progress(50);
        assert_eq!(j.progress, 50);

        j.succeed(json!({"version": 1})).unwrap();
        assert_eq!(j.status, JobStatus::Succeeded);
        assert_eq!(j.progress, 100);
        assert!(j.result.is_some());
        assert!(j.message.is_none());
        assert!(j.completed_at.is_some());
        assert!(j.is_terminal());
        assert!(j.validate().is_ok());
    }

    #[test]
    fn test_job_failure_path() {
        let mut j = job(JobType::RunBlender);

        j.start().unwrap();
        j.fail("Blender failed with return code 11").unwrap();

        assert_eq!(j.status, JobStatus::Failed);
        assert_eq!(
            j.message.as_deref(),
            Some("Blender failed with return code 11")
        );
        assert!(j.result.is_none());
        assert!(j.is_terminal());
        assert!(j.validate().is_ok());
    }

    #[test]
    fn test_job_rejected_before_pickup() {
        let mut j = job(JobType::Extract);

        // Precondition failure before the job ever runs
        j.fail("Scale reference not set. Please set reference dimension first.")
            .unwrap();
        assert_eq!(j.status, JobStatus::Failed);
        assert!(j.started_at.is_none());
        assert!(j.validate().is_ok());
    }

    #[test]
    fn test_terminal_jobs_cannot_transition() {
        let mut j = job(JobType::Extract);
        j.start().unwrap();
        j.succeed(json!({})).unwrap();

        assert!(j.start().is_err());
        assert!(j.fail("late").is_err());
        assert!(j.succeed(json!({})).is_err());
    }

    #[test]
    fn test_queued_job_cannot_succeed() {
        let mut j = job(JobType::Extract);
        assert!(j.succeed(json!({})).is_err());
        assert_eq!(j.status, JobStatus::Queued);
    }

    #[test]
    fn test_progress_is_monotonic_and_clamped() {
        let mut j = job(JobType::Extract);
        j.start().unwrap();

        j.update_progress(40);
        assert_eq!(j.progress, 40);

        // Never decreases
        j.update_progress(10);
        assert_eq!(j.progress, 40);

        // Clamped to bounds
        j.update_progress(150);
        assert_eq!(j.progress, 100);

        let mut j2 = job(JobType::Extract);
        j2.update_progress(-5);
        assert_eq!(j2.progress, 0);
    }

    #[test]
    fn test_validate_result_iff_succeeded() {
        let mut j = job(JobType::Extract);
        j.result = Some(Json(json!({})));
        assert!(j.validate().is_err());

        let mut ok = job(JobType::Extract);
        ok.start().unwrap();
        ok.succeed(json!({})).unwrap();
        ok.result = None;
        assert!(ok.validate().is_err());
    }

    #[test]
    fn test_validate_message_iff_failed() {
        let mut j = job(JobType::Extract);
        j.message = Some("noise".to_string());
        assert!(j.validate().is_err());

        let mut failed = job(JobType::Extract);
        failed.start().unwrap();
        failed.fail("boom").unwrap();
        failed.message = None;
        assert!(failed.validate().is_err());
    }

    #[test]
    fn test_job_type_serialization() {
        assert_eq!(
            serde_json::to_string(&JobType::GenerateScript).unwrap(),
            "\"generate_script\""
        );
        assert_eq!(
            serde_json::from_str::<JobType>("\"run_blender\"").unwrap(),
            JobType::RunBlender
        );
        assert!(serde_json::from_str::<JobType>("\"render\"").is_err());
    }

    #[test]
    fn test_job_status_serialization() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Succeeded).unwrap(),
            "\"succeeded\""
        );
        assert_eq!(
            serde_json::from_str::<JobStatus>("\"queued\"").unwrap(),
            JobStatus::Queued
        );
    }
}
