use std::time::Duration;

use electricity_client::domain::HourlyRecord;
use futures::StreamExt;
use sqlx::{postgres::PgPool, Postgres, QueryBuilder};

use super::{Envelope, PipelineError, Sink};

/// Upserts hourly records into `electricity_data`, keyed on `start_time`.
pub struct PgHourlyRecordSink {
    pool: PgPool,
    batch_size: usize,
    max_retries: u32,
    retry_backoff: Duration,
}

impl PgHourlyRecordSink {
    pub fn new(pool: PgPool, batch_size: usize, max_retries: u32, retry_backoff: Duration) -> Self {
        Self {
            pool,
            batch_size: batch_size.max(1),
            max_retries,
            retry_backoff,
        }
    }

    async fn flush_batch(&self, batch: &[Envelope<HourlyRecord>]) -> Result<(), PipelineError> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut attempt: u32 = 0;
        loop {
            match self.upsert_batch(batch).await {
                Ok(()) => {
                    metrics::counter!("electricity_data_upserted_records_total")
                        .increment(batch.len() as u64);

                    if let Some(min_received) = batch.iter().map(|e| e.received_at).min() {
                        if let Ok(dur) = std::time::SystemTime::now().duration_since(min_received) {
                            metrics::histogram!("ingest_end_to_end_latency_seconds")
                                .record(dur.as_secs_f64());
                        }
                    }

                    return Ok(());
                }
                Err(e) if attempt < self.max_retries => {
                    attempt += 1;
                    tracing::warn!(
                        error = %e,
                        attempt,
                        "electricity_data upsert failed, retrying with backoff"
                    );
                    tokio::time::sleep(self.retry_backoff * attempt).await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "electricity_data upsert failed, giving up");
                    metrics::counter!("electricity_data_sink_errors_total").increment(1);
                    return Err(PipelineError::Sink(e.to_string()));
                }
            }
        }
    }

    async fn upsert_batch(&self, batch: &[Envelope<HourlyRecord>]) -> Result<(), sqlx::Error> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "INSERT INTO electricity_data \
             (date, start_time, production_amount, consumption_amount, hourly_price) ",
        );

        // ON CONFLICT cannot touch one row twice per statement; last record
        // per start_time wins.
        let mut rows: Vec<&HourlyRecord> = Vec::with_capacity(batch.len());
        for env in batch {
            match rows.iter().position(|r| r.start_time == env.payload.start_time) {
                Some(idx) => rows[idx] = &env.payload,
                None => rows.push(&env.payload),
            }
        }

        builder.push_values(rows, |mut b, r| {
            b.push_bind(r.date)
                .push_bind(r.start_time)
                .push_bind(r.production_amount)
                .push_bind(r.consumption_amount)
                .push_bind(r.hourly_price);
        });
        builder.push(
            " ON CONFLICT (start_time) DO UPDATE SET \
             date = EXCLUDED.date, \
             production_amount = EXCLUDED.production_amount, \
             consumption_amount = EXCLUDED.consumption_amount, \
             hourly_price = EXCLUDED.hourly_price",
        );

        builder.build().execute(&self.pool).await.map(|_| ())
    }
}

#[async_trait::async_trait]
impl Sink<HourlyRecord> for PgHourlyRecordSink {
    async fn run<S>(&self, mut input: S) -> Result<(), PipelineError>
    where
        S: futures::Stream<Item = Result<Envelope<HourlyRecord>, PipelineError>>
            + Send
            + Unpin
            + 'static,
    {
        let mut buffer: Vec<Envelope<HourlyRecord>> = Vec::with_capacity(self.batch_size);

        while let Some(item) = input.next().await {
            let env = match item {
                Ok(env) => env,
                Err(e) => {
                    tracing::warn!(error = %e, "skipping record rejected upstream");
                    metrics::counter!("ingest_records_skipped_total").increment(1);
                    continue;
                }
            };

            buffer.push(env);
            if buffer.len() >= self.batch_size {
                self.flush_batch(&buffer).await?;
                buffer.clear();
            }
        }

        self.flush_batch(&buffer).await
    }
}
