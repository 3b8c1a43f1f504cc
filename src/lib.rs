// DataLens - client for a remote tabular analysis service

pub mod chart;
pub mod config;
pub mod data_registry;
pub mod dispatcher;
pub mod models;
pub mod selection;
pub mod service;
pub mod tui;       // Terminal front end
pub mod types;
pub mod upload;
pub mod workflow;

// Re-exports for convenience
pub use config::Config;
pub use dispatcher::{ActiveResult, Operation};
pub use types::{AppError, AppResult};
pub use workflow::{Settlement, Workflow, WorkflowSnapshot};
