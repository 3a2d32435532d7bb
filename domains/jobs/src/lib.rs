//! Jobs domain: async job queue and worker runtime
//!
//! Jobs are persisted rows; the queue is the jobs table itself. Creation
//! inserts a `queued` row, dispatcher loops claim the oldest queued job
//! with `FOR UPDATE SKIP LOCKED`, and worker tasks drive it to `succeeded`
//! or `failed` while clients poll `GET /v1/jobs/{id}`.

pub mod api;
pub mod domain;
pub mod repository;
pub mod worker;

pub use api::{routes, JobsState};
pub use domain::entities::{Job, JobStatus, JobType};
pub use repository::JobRepository;
pub use worker::{JobDispatcher, WorkerContext};
