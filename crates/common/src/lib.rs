//! Shared utilities, configuration, and error handling for Meshforge
//!
//! This crate provides common functionality used across the Meshforge
//! application:
//! - Configuration management following 12-factor principles
//! - Error types and handling
//! - Local file storage for uploads and generated outputs
//! - Custom axum extractors

pub mod config;
pub mod error;
pub mod extractors;
pub mod storage;

pub use config::{BlenderExecMode, Config};
pub use error::{Error, Result};
pub use extractors::{Pagination, ValidatedJson};
pub use storage::Storage;
