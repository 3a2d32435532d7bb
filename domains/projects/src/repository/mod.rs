//! Repository implementations for the Projects domain

pub mod projects;

pub use projects::ProjectRepository;
