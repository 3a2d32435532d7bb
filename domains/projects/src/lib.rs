//! Projects domain: the project registry grouping assets and jobs

pub mod api;
pub mod domain;
pub mod repository;

pub use api::{routes, ProjectsState};
pub use domain::entities::Project;
pub use repository::ProjectRepository;
