//! Extraction domain state

use meshforge_projects::ProjectRepository;

use crate::repository::{ExtractionResultRepository, ScaleReferenceRepository};

/// Application state for the Extraction domain
#[derive(Clone)]
pub struct ExtractionState {
    pub scale_references: ScaleReferenceRepository,
    pub results: ExtractionResultRepository,
    pub projects: ProjectRepository,
}
