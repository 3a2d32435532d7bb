//! HTTP handlers for the Scripts domain

pub mod scripts;
