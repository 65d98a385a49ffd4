//! Engagement Dashboard Library
//!
//! Loads an engagement spreadsheet export, buckets it by calendar week and
//! exposes the cascading filters and aggregates to the server and the CLI.

pub mod config;
pub mod dataset;
pub mod filter;
pub mod report;
pub mod server;

// Re-export commonly used types for convenience
pub use dataset::{load_dataset, ColumnSchema, Dataset, LoadError, SchemaPreset};
pub use filter::{Dimension, FilterEngine, SelectionRequest};
pub use report::DashboardView;
pub use server::{run_server, RequestsLoggingLevel};
