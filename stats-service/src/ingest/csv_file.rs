use std::{fs::File, path::PathBuf, str::FromStr};

use csv::StringRecord;
use electricity_client::{domain::HourlyRecord, serde_formats};
use rust_decimal::Decimal;

use super::{Envelope, EnvelopeStream, PipelineError, Source};

/// CSV source for `HourlyRecord`.
///
/// Expected header columns (by name):
/// - date (YYYY-MM-DD)
/// - start_time (YYYY-MM-DDTHH:MM:SS or YYYY-MM-DD HH:MM:SS)
/// - production_amount (kWh, optional)
/// - consumption_amount (kWh, optional)
/// - hourly_price (optional)
///
/// An empty cell or a missing optional column is read as null.
pub struct HourlyRecordCsvFileSource {
    path: PathBuf,
    delimiter: u8,
}

impl HourlyRecordCsvFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            delimiter: b',',
        }
    }

    /// Read a differently delimited file, e.g. `b';'` for spreadsheet exports.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

fn parse_optional_decimal(name: &str, s: &str) -> Result<Option<Decimal>, PipelineError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map(Some)
        .map_err(|e| PipelineError::Source(format!("invalid {name} '{trimmed}': {e}")))
}

fn record_to_hourly(
    record: &StringRecord,
    headers: &StringRecord,
) -> Result<HourlyRecord, PipelineError> {
    let get = |name: &str| -> Result<&str, PipelineError> {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .and_then(|idx| record.get(idx))
            .ok_or_else(|| PipelineError::Source(format!("missing column '{name}' in CSV record")))
    };

    let date_str = get("date")?.trim();
    let date = serde_formats::parse_date(date_str)
        .map_err(|e| PipelineError::Source(format!("invalid date '{date_str}': {e}")))?;

    let ts_str = get("start_time")?.trim();
    let start_time = serde_formats::parse_timestamp(ts_str)
        .map_err(|e| PipelineError::Source(format!("invalid start_time '{ts_str}': {e}")))?;

    let optional = |name: &str| parse_optional_decimal(name, get(name).unwrap_or(""));

    Ok(HourlyRecord {
        date,
        start_time,
        production_amount: optional("production_amount")?,
        consumption_amount: optional("consumption_amount")?,
        hourly_price: optional("hourly_price")?,
    })
}

#[async_trait::async_trait]
impl Source<HourlyRecord> for HourlyRecordCsvFileSource {
    async fn stream(&self) -> EnvelopeStream<HourlyRecord> {
        // Blocking reader inside one async task; fine for backfill-sized files.
        let path = self.path.clone();
        let delimiter = self.delimiter;
        let s = async_stream::stream! {
            let file = match File::open(&path) {
                Ok(f) => f,
                Err(e) => {
                    yield Err(PipelineError::Source(format!("failed to open CSV file: {e}")));
                    return;
                }
            };
            let mut rdr = csv::ReaderBuilder::new()
                .delimiter(delimiter)
                .from_reader(file);
            let headers = match rdr.headers() {
                Ok(h) => h.clone(),
                Err(e) => {
                    yield Err(PipelineError::Source(format!("failed to read CSV headers: {e}")));
                    return;
                }
            };

            // A bad row is reported as one failed item; reading goes on.
            for result in rdr.records() {
                let parsed = result
                    .map_err(|e| PipelineError::Source(format!("failed to read CSV record: {e}")))
                    .and_then(|record| record_to_hourly(&record, &headers));

                match parsed {
                    Ok(hourly) => {
                        yield Ok(Envelope::new(hourly));
                    }
                    Err(e) => {
                        metrics::counter!("hourly_record_csv_parse_errors_total").increment(1);
                        yield Err(e);
                    }
                }
            }
        };

        Box::pin(s)
    }
}
