use rust_decimal::Decimal;
use time::Date;

/// Per-day aggregate derived from hourly records. Never persisted.
///
/// Totals are MWh; `None` means no hour of the day carried a value.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: Date,
    pub total_production: Option<Decimal>,
    pub total_consumption: Option<Decimal>,
    pub average_price: Option<Decimal>,
    pub longest_negative_price_streak_hours: u32,
}

/// A maximal run of consecutive negative-price hours within one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegativeStreak {
    pub date: Date,
    pub start_hour: u8,
    pub length_hours: u32,
}
