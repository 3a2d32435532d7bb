//! Projects domain state

use crate::repository::ProjectRepository;

/// Application state for the Projects domain
#[derive(Clone)]
pub struct ProjectsState {
    pub projects: ProjectRepository,
}
