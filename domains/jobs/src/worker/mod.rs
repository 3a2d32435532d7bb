//! Worker runtime: dispatcher loop and task implementations

pub mod dispatcher;
pub mod script;
pub mod tasks;

pub use dispatcher::JobDispatcher;
pub use tasks::WorkerContext;
