pub mod memory;
pub mod postgres;

pub use memory::InMemoryRecordSource;
pub use postgres::PgRecordSource;

use electricity_client::domain::HourlyRecord;
use time::Date;

/// Inclusive date bounds for a fetch. `None` leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateWindow {
    pub start: Option<Date>,
    pub end: Option<Date>,
}

impl DateWindow {
    pub fn contains(&self, date: Date) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }

    /// True when the bounds are inverted, so no date can fall inside.
    pub fn is_empty(&self) -> bool {
        matches!((self.start, self.end), (Some(s), Some(e)) if s > e)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("record source unavailable: {0}")]
    Unavailable(String),
}

/// Supplies hourly records to the stats pipeline.
///
/// Implementations own connection lifecycle and consistency of the
/// underlying data; callers pass one in per query.
#[async_trait::async_trait]
pub trait RecordSource: Send + Sync {
    /// All records whose date lies in `window`.
    async fn hourly_records(&self, window: DateWindow) -> Result<Vec<HourlyRecord>, SourceError>;

    /// Records of one date, ordered by start time.
    async fn hourly_records_for_date(&self, date: Date) -> Result<Vec<HourlyRecord>, SourceError>;
}
