//! Repository implementations for the Assets domain

pub mod assets;

pub use assets::AssetRepository;
