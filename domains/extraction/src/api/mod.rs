//! API layer for the Extraction domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::ExtractionState;
pub use routes::routes;
