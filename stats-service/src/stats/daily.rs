use std::collections::BTreeMap;

use electricity_client::domain::{DailySummary, HourlyRecord};
use rust_decimal::Decimal;
use time::Date;

use super::streak;

const KWH_PER_MWH: Decimal = Decimal::ONE_THOUSAND;

/// Null-aware running sum: stays `None` until a value is seen.
#[derive(Debug, Default, Clone, Copy)]
struct NullableSum(Option<Decimal>);

impl NullableSum {
    fn add(&mut self, value: Option<Decimal>) {
        if let Some(v) = value {
            self.0 = Some(self.0.unwrap_or(Decimal::ZERO) + v);
        }
    }
}

/// Mean over non-null values only.
#[derive(Debug, Default, Clone, Copy)]
struct NullableMean {
    sum: Decimal,
    count: u32,
}

impl NullableMean {
    fn add(&mut self, value: Option<Decimal>) {
        if let Some(v) = value {
            self.sum += v;
            self.count += 1;
        }
    }

    fn value(&self) -> Option<Decimal> {
        (self.count > 0).then(|| self.sum / Decimal::from(self.count))
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct DailyTotals {
    production_kwh: NullableSum,
    consumption_kwh: NullableSum,
    price: NullableMean,
}

/// Convert a kWh amount to MWh.
pub fn kwh_to_mwh(kwh: Decimal) -> Decimal {
    kwh / KWH_PER_MWH
}

fn daily_totals(records: &[HourlyRecord]) -> BTreeMap<Date, DailyTotals> {
    let mut totals: BTreeMap<Date, DailyTotals> = BTreeMap::new();
    for r in records {
        let day = totals.entry(r.date).or_default();
        day.production_kwh.add(r.production_amount);
        day.consumption_kwh.add(r.consumption_amount);
        day.price.add(r.hourly_price);
    }
    totals
}

/// One summary per distinct date in `records`.
///
/// Totals are summed exactly in kWh and converted to MWh once per day; the
/// longest negative-price streak is outer-joined on date, so a date with no
/// negative hour reports `0`. Output is ordered by date, but callers must
/// not rely on that: ordering belongs to [`super::sort`].
pub fn summarize(records: &[HourlyRecord]) -> Vec<DailySummary> {
    let totals = daily_totals(records);
    let streaks = streak::longest_streaks(records);

    totals
        .into_iter()
        .map(|(date, t)| DailySummary {
            date,
            total_production: t.production_kwh.0.map(kwh_to_mwh),
            total_consumption: t.consumption_kwh.0.map(kwh_to_mwh),
            average_price: t.price.value(),
            longest_negative_price_streak_hours: streaks.get(&date).copied().unwrap_or(0),
        })
        .collect()
}
