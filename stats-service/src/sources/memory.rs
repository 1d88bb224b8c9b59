use std::sync::Arc;

use electricity_client::domain::HourlyRecord;
use time::Date;

use super::{DateWindow, RecordSource, SourceError};

/// A fixed snapshot of hourly records held in memory.
#[derive(Clone, Default)]
pub struct InMemoryRecordSource {
    records: Arc<Vec<HourlyRecord>>,
}

impl InMemoryRecordSource {
    pub fn new(mut records: Vec<HourlyRecord>) -> Self {
        records.sort_by_key(|r| r.start_time);
        Self {
            records: Arc::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait::async_trait]
impl RecordSource for InMemoryRecordSource {
    async fn hourly_records(&self, window: DateWindow) -> Result<Vec<HourlyRecord>, SourceError> {
        Ok(self
            .records
            .iter()
            .filter(|r| window.contains(r.date))
            .cloned()
            .collect())
    }

    async fn hourly_records_for_date(&self, date: Date) -> Result<Vec<HourlyRecord>, SourceError> {
        Ok(self.records.iter().filter(|r| r.date == date).cloned().collect())
    }
}
