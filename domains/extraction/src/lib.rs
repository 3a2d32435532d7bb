//! Extraction domain: per-project scale references (calibration dimensions)
//! and versioned extraction results produced by `extract` jobs

pub mod api;
pub mod domain;
pub mod repository;

pub use api::{routes, ExtractionState};
pub use domain::entities::{DimensionItem, ExtractionResult, ScaleReference};
pub use repository::{ExtractionResultRepository, ScaleReferenceRepository};
