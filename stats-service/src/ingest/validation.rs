use electricity_client::domain::HourlyRecord;
use rust_decimal::Decimal;
use time::macros::datetime;

use super::{Envelope, PipelineError, Transform};

/// Pure validation of an `HourlyRecord`.
///
/// Rules:
/// - `date` must be the calendar date of `start_time`.
/// - production and consumption must be non-negative when present.
/// - `start_time` must be within [2000-01-01, 2100-01-01).
///
/// Prices may be negative.
pub fn validate_hourly_record(
    env: Envelope<HourlyRecord>,
) -> Result<Envelope<HourlyRecord>, PipelineError> {
    let r = &env.payload;

    if r.start_time.date() != r.date {
        return Err(PipelineError::Transform(format!(
            "start_time {} does not fall on date {}",
            r.start_time, r.date
        )));
    }

    let negative = |v: Option<Decimal>| v.is_some_and(|v| v < Decimal::ZERO);
    if negative(r.production_amount) {
        return Err(PipelineError::Transform("production_amount must be non-negative".to_string()));
    }
    if negative(r.consumption_amount) {
        return Err(PipelineError::Transform("consumption_amount must be non-negative".to_string()));
    }

    let min_ts = datetime!(2000-01-01 00:00:00);
    let max_ts = datetime!(2100-01-01 00:00:00);
    if r.start_time < min_ts || r.start_time >= max_ts {
        return Err(PipelineError::Transform("start_time out of allowed range".to_string()));
    }

    Ok(env)
}

#[derive(Clone, Default)]
pub struct HourlyRecordValidation;

#[async_trait::async_trait]
impl Transform<HourlyRecord, HourlyRecord> for HourlyRecordValidation {
    async fn apply(
        &self,
        input: Envelope<HourlyRecord>,
    ) -> Result<Envelope<HourlyRecord>, PipelineError> {
        validate_hourly_record(input).inspect_err(|_| {
            metrics::counter!("validation_hourly_record_rejected_total").increment(1);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::date;

    fn env(date: time::Date, start_time: time::PrimitiveDateTime) -> Envelope<HourlyRecord> {
        Envelope::new(HourlyRecord {
            date,
            start_time,
            production_amount: Some(dec!(30000)),
            consumption_amount: None,
            hourly_price: Some(dec!(-10)),
        })
    }

    #[test]
    fn accepts_negative_prices() {
        let res = validate_hourly_record(env(date!(2025 - 12 - 30), datetime!(2025-12-30 05:00)));
        assert!(res.is_ok());
    }

    #[test]
    fn rejects_a_start_time_on_another_date() {
        let res = validate_hourly_record(env(date!(2025 - 12 - 30), datetime!(2025-12-31 00:00)));
        assert!(matches!(res, Err(PipelineError::Transform(_))));
    }

    #[test]
    fn rejects_negative_amounts() {
        let mut e = env(date!(2025 - 12 - 30), datetime!(2025-12-30 05:00:00));
        e.payload.consumption_amount = Some(dec!(-0.5));
        assert!(matches!(validate_hourly_record(e), Err(PipelineError::Transform(_))));
    }

    #[test]
    fn rejects_out_of_range_timestamps() {
        let res = validate_hourly_record(env(date!(1999 - 12 - 31), datetime!(1999-12-31 23:00)));
        assert!(matches!(res, Err(PipelineError::Transform(_))));
    }
}
