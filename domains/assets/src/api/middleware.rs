//! Assets domain state

use meshforge_common::Storage;
use meshforge_projects::ProjectRepository;

use crate::repository::AssetRepository;

/// Application state for the Assets domain
#[derive(Clone)]
pub struct AssetsState {
    pub assets: AssetRepository,
    pub projects: ProjectRepository,
    pub storage: Storage,
}
