//! Repository implementations for the Scripts domain

pub mod scripts;

pub use scripts::ScriptVersionRepository;
