//! Domain layer for the Scripts domain

pub mod entities;
