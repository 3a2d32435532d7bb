//! Domain layer for the Extraction domain

pub mod entities;
