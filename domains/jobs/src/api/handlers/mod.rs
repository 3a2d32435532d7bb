//! HTTP handlers for the Jobs domain

pub mod blender;
pub mod jobs;
