//! HTTP handlers for the Extraction domain

pub mod extraction;
