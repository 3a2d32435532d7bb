//! HTTP handlers for the Assets domain

pub mod assets;
