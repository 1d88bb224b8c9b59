//! Print the daily summaries of a CSV export as JSON, without a database.

use anyhow::{bail, Result};
use electricity_client::domain::HourlyRecord;
use stats_service::{
    api::params::{parse_stats_query, RawStatsParams},
    ingest::{CollectSink, HourlyRecordCsvFileSource, HourlyRecordValidation, Pipeline},
    observability,
    sources::InMemoryRecordSource,
    stats::{self, response::DailyStatsBody, sort::Page, DEFAULT_LIMIT},
};
use std::{env, sync::Arc};

#[tokio::main]
async fn main() -> Result<()> {
    observability::init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        bail!("usage: daily-report <csv_file_path> [sortBy] [asc|desc]");
    }

    let (sink, collected) = CollectSink::with_handle();
    let pipeline: Pipeline<_, HourlyRecord, _> = Pipeline {
        source: HourlyRecordCsvFileSource::new(&args[1]),
        transforms: vec![Arc::new(HourlyRecordValidation)],
        sink,
    };
    pipeline.run().await?;

    let records = std::mem::take(&mut *collected.lock().await);
    tracing::info!(records = records.len(), "loaded hourly records");

    let mut query = parse_stats_query(
        RawStatsParams {
            sort_by: args.get(2).cloned(),
            sort_direction: args.get(3).cloned(),
            ..Default::default()
        },
        DEFAULT_LIMIT,
    )?;
    query.page = Page::unbounded();

    let source = InMemoryRecordSource::new(records);
    let page = stats::daily_stats(&source, &query).await?;
    println!("{}", serde_json::to_string_pretty(&DailyStatsBody::from(page))?);

    Ok(())
}
