//! Assets domain: uploaded reference files (images, 2D drawings, 3D models)
//! and generated outputs registered by Blender runs

pub mod api;
pub mod domain;
pub mod repository;

pub use api::{routes, AssetsState};
pub use domain::entities::{Asset, AssetType};
pub use repository::AssetRepository;
