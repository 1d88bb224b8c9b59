use anyhow::{bail, Result};
use electricity_client::domain::HourlyRecord;
use sqlx::postgres::PgPoolOptions;
use stats_service::{
    config::AppConfig,
    ingest::{HourlyRecordCsvFileSource, HourlyRecordValidation, PgHourlyRecordSink, Pipeline},
    observability,
};
use std::{env, sync::Arc, time::Duration};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!("usage: backfill-hourly-records <csv_file_path> [delimiter]");
    }
    let file_path = &args[1];
    let delimiter = match args.get(2).map(String::as_bytes) {
        None => b',',
        Some([d]) => *d,
        Some(_) => bail!("delimiter must be a single ASCII character"),
    };

    // STATS_CONFIG may point at a backfill-specific file.
    let cfg = AppConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(cfg.database.max_connections)
        .connect(&cfg.database.uri)
        .await?;

    let sink = PgHourlyRecordSink::new(
        pool,
        cfg.ingest.batch_size,
        cfg.ingest.max_retries,
        Duration::from_millis(cfg.ingest.retry_backoff_ms),
    );
    let source = HourlyRecordCsvFileSource::new(file_path).with_delimiter(delimiter);

    let pipeline: Pipeline<_, HourlyRecord, _> = Pipeline {
        source,
        transforms: vec![Arc::new(HourlyRecordValidation)],
        sink,
    };

    tracing::info!(file = %file_path, "backfilling hourly records");
    pipeline.run().await?;

    Ok(())
}
