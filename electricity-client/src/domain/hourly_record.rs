use rust_decimal::Decimal;
use time::{Date, PrimitiveDateTime};

/// One measured hour as stored in `electricity_data`.
///
/// Amounts are kWh, `hourly_price` is per unit. `start_time` is wall-clock
/// time in the zone the data was recorded in, so `start_time.hour()` is the
/// hour-of-day within `date`.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct HourlyRecord {
    pub date: Date,
    pub start_time: PrimitiveDateTime,
    pub production_amount: Option<Decimal>,
    pub consumption_amount: Option<Decimal>,
    pub hourly_price: Option<Decimal>,
}

impl HourlyRecord {
    pub fn hour(&self) -> u8 {
        self.start_time.hour()
    }

    /// Strictly below zero. A zero or missing price is not negative.
    pub fn has_negative_price(&self) -> bool {
        self.hourly_price.is_some_and(|p| p < Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::{date, datetime};

    fn record(price: Option<Decimal>) -> HourlyRecord {
        HourlyRecord {
            date: date!(2025 - 12 - 30),
            start_time: datetime!(2025-12-30 07:00:00),
            production_amount: None,
            consumption_amount: None,
            hourly_price: price,
        }
    }

    #[test]
    fn negative_price_is_strict() {
        assert!(record(Some(dec!(-0.001))).has_negative_price());
        assert!(!record(Some(dec!(0))).has_negative_price());
        assert!(!record(Some(dec!(-0.000))).has_negative_price());
        assert!(!record(Some(dec!(3.5))).has_negative_price());
        assert!(!record(None).has_negative_price());
    }

    #[test]
    fn hour_comes_from_start_time() {
        assert_eq!(record(None).hour(), 7);
    }
}
