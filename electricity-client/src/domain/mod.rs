pub mod daily_summary;
pub mod hourly_record;

pub use daily_summary::{DailySummary, NegativeStreak};
pub use hourly_record::HourlyRecord;
