//! Scripts domain: versioned Blender Python scripts produced by
//! `generate_script` jobs

pub mod api;
pub mod domain;
pub mod repository;

pub use api::{routes, ScriptsState};
pub use domain::entities::ScriptVersion;
pub use repository::ScriptVersionRepository;
