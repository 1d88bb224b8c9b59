//! Streaming load path for hourly records: a source yields envelopes, same
//! type transforms validate them, and a sink persists them in batches.

pub mod csv_file;
pub mod postgres_sink;
pub mod validation;

pub use csv_file::HourlyRecordCsvFileSource;
pub use postgres_sink::PgHourlyRecordSink;
pub use validation::HourlyRecordValidation;

use std::{pin::Pin, sync::Arc, time::SystemTime};

use futures::{Stream, StreamExt};

#[derive(Debug, Clone)]
pub struct Envelope<T> {
    pub payload: T,
    pub received_at: SystemTime,
}

impl<T> Envelope<T> {
    pub fn new(payload: T) -> Self {
        Self {
            payload,
            received_at: SystemTime::now(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("source error: {0}")]
    Source(String),
    #[error("transform error: {0}")]
    Transform(String),
    #[error("sink error: {0}")]
    Sink(String),
}

pub type EnvelopeStream<T> = Pin<Box<dyn Stream<Item = Result<Envelope<T>, PipelineError>> + Send>>;

#[async_trait::async_trait]
pub trait Source<T>: Send + Sync {
    async fn stream(&self) -> EnvelopeStream<T>;
}

#[async_trait::async_trait]
pub trait Transform<I, O>: Send + Sync {
    async fn apply(&self, input: Envelope<I>) -> Result<Envelope<O>, PipelineError>;
}

#[async_trait::async_trait]
pub trait Sink<T>: Send + Sync {
    async fn run<S>(&self, input: S) -> Result<(), PipelineError>
    where
        S: Stream<Item = Result<Envelope<T>, PipelineError>> + Send + Unpin + 'static;
}

pub struct Pipeline<S, T, K> {
    pub source: S,
    pub transforms: Vec<Arc<dyn Transform<T, T> + Send + Sync>>,
    pub sink: K,
}

impl<T, S, K> Pipeline<S, T, K>
where
    T: Send + 'static,
    S: Source<T> + Send + Sync + 'static,
    K: Sink<T> + Send + Sync + 'static,
{
    pub async fn run(self) -> Result<(), PipelineError> {
        let mut stream = self.source.stream().await;

        for t in self.transforms {
            stream = Box::pin(stream.then(move |item| {
                let t = t.clone();
                async move {
                    match item {
                        Ok(env) => t.apply(env).await,
                        Err(e) => Err(e),
                    }
                }
            }));
        }

        self.sink.run(stream).await
    }
}

/// Keeps every payload in memory. Upstream errors are logged and skipped,
/// the same policy the database sink applies.
pub struct CollectSink<T> {
    items: Arc<tokio::sync::Mutex<Vec<T>>>,
}

impl<T> CollectSink<T> {
    pub fn with_handle() -> (Self, Arc<tokio::sync::Mutex<Vec<T>>>) {
        let items = Arc::new(tokio::sync::Mutex::new(Vec::new()));
        (
            Self {
                items: items.clone(),
            },
            items,
        )
    }
}

#[async_trait::async_trait]
impl<T> Sink<T> for CollectSink<T>
where
    T: Send + 'static,
{
    async fn run<S>(&self, mut input: S) -> Result<(), PipelineError>
    where
        S: Stream<Item = Result<Envelope<T>, PipelineError>> + Send + Unpin + 'static,
    {
        while let Some(item) = input.next().await {
            match item {
                Ok(env) => self.items.lock().await.push(env.payload),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping record rejected upstream");
                    metrics::counter!("ingest_records_skipped_total").increment(1);
                }
            }
        }
        Ok(())
    }
}
