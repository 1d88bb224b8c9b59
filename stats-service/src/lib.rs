pub mod api;
pub mod config;
pub mod ingest;
pub mod metrics_server;
pub mod observability;
pub mod sources;
pub mod stats;

pub use api::{router, AppState};
