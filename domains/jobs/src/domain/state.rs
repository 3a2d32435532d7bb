//! State machine for job lifecycle
//!
//! Defines the valid states, the events that trigger transitions, and the
//! terminal states. Status only ever advances: once a job is succeeded or
//! failed it stays there.

use thiserror::Error;

/// Errors that can occur during state transitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StateError {
    #[error("Invalid transition: cannot apply {event} from {from}")]
    InvalidTransition { from: String, event: String },

    #[error("Terminal state: {0} is a terminal state and cannot transition")]
    TerminalState(String),
}

/// Job lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    Queued,
    Running,
    Succeeded,
    Failed,
}

impl JobState {
    /// Check if this is a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    /// Get all valid next states from the current state
    pub fn valid_transitions(&self) -> &'static [JobState] {
        match self {
            // Queued jobs can fail before pickup (e.g. rejected by a worker
            // precondition check) without ever running.
            Self::Queued => &[Self::Running, Self::Failed],
            Self::Running => &[Self::Succeeded, Self::Failed],
            Self::Succeeded => &[],
            Self::Failed => &[],
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Queued => write!(f, "queued"),
            Self::Running => write!(f, "running"),
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Events that trigger job state transitions
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    /// A worker claims the job for execution
    WorkerPicksUp,
    /// The job's task completed successfully
    Success,
    /// The job's task failed
    Failure,
}

impl std::fmt::Display for JobEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WorkerPicksUp => write!(f, "worker_picks_up"),
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
        }
    }
}

/// Job state machine
pub struct JobStateMachine;

impl JobStateMachine {
    /// Attempt a state transition
    ///
    /// Returns the new state if the transition is valid, or an error otherwise.
    pub fn transition(current: JobState, event: JobEvent) -> Result<JobState, StateError> {
        if current.is_terminal() {
            return Err(StateError::TerminalState(current.to_string()));
        }

        let next = match (&current, &event) {
            (JobState::Queued, JobEvent::WorkerPicksUp) => JobState::Running,
            (JobState::Queued, JobEvent::Failure) => JobState::Failed,

            (JobState::Running, JobEvent::Success) => JobState::Succeeded,
            (JobState::Running, JobEvent::Failure) => JobState::Failed,

            _ => {
                return Err(StateError::InvalidTransition {
                    from: current.to_string(),
                    event: event.to_string(),
                });
            }
        };

        Ok(next)
    }
}
