use electricity_client::{db::electricity_queries, domain::HourlyRecord};
use sqlx::PgPool;
use time::Date;

use super::{DateWindow, RecordSource, SourceError};

/// Reads `electricity_data` over a shared connection pool.
#[derive(Clone)]
pub struct PgRecordSource {
    pool: PgPool,
}

impl PgRecordSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn unavailable(e: anyhow::Error) -> SourceError {
    metrics::counter!("stats_source_errors_total").increment(1);
    SourceError::Unavailable(format!("{e:#}"))
}

#[async_trait::async_trait]
impl RecordSource for PgRecordSource {
    async fn hourly_records(&self, window: DateWindow) -> Result<Vec<HourlyRecord>, SourceError> {
        electricity_queries::hourly_records(&self.pool, window.start, window.end)
            .await
            .map_err(unavailable)
    }

    async fn hourly_records_for_date(&self, date: Date) -> Result<Vec<HourlyRecord>, SourceError> {
        electricity_queries::hourly_records_for_date(&self.pool, date)
            .await
            .map_err(unavailable)
    }
}
