//! API layer for the Scripts domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::ScriptsState;
pub use routes::routes;
