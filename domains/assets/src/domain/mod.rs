//! Domain layer for the Assets domain

pub mod entities;
