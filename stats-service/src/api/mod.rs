pub mod error;
pub mod params;
pub mod stats;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::sources::RecordSource;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn RecordSource>,
    pub default_limit: usize,
}

impl AppState {
    pub fn new(source: Arc<dyn RecordSource>, default_limit: usize) -> Self {
        Self {
            source,
            default_limit,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::<AppState>::new()
        .route("/stats", get(stats::get_daily_stats))
        .route("/stats/:date", get(stats::get_hourly_stats))
        .with_state(state)
}
