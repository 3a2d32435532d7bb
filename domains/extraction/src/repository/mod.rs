//! Repository implementations for the Extraction domain

pub mod results;
pub mod scale_references;

pub use results::ExtractionResultRepository;
pub use scale_references::ScaleReferenceRepository;
