//! Jobs domain state

use std::sync::Arc;

use meshforge_blender::BlenderRunner;
use meshforge_common::Config;
use meshforge_projects::ProjectRepository;

use crate::repository::JobRepository;

/// Application state for the Jobs domain
#[derive(Clone)]
pub struct JobsState {
    pub jobs: JobRepository,
    pub projects: ProjectRepository,
    pub blender: Arc<dyn BlenderRunner>,
    pub config: Config,
}
