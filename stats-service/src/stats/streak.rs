use std::collections::BTreeMap;

use electricity_client::domain::{HourlyRecord, NegativeStreak};
use time::Date;

/// Find every maximal run of negative-price hours, per date.
///
/// Within a date, the negative hours are ranked 1.. in start-time order. A run
/// of consecutive hours keeps `hour - rank` constant, and any gap (a
/// non-negative hour, a missing price or a missing hour) changes it, so
/// grouping by `(date, hour - rank)` yields exactly the maximal runs.
///
/// Input order does not matter. Runs are returned ordered by date, then by
/// their first hour.
pub fn negative_streaks(records: &[HourlyRecord]) -> Vec<NegativeStreak> {
    let mut by_date: BTreeMap<Date, Vec<&HourlyRecord>> = BTreeMap::new();
    for r in records {
        by_date.entry(r.date).or_default().push(r);
    }

    let mut streaks = Vec::new();
    for (date, mut hours) in by_date {
        hours.sort_by_key(|r| r.start_time);

        // run key -> (first hour, length)
        let mut runs: BTreeMap<i64, (u8, u32)> = BTreeMap::new();
        let negative = hours.iter().filter(|r| r.has_negative_price());
        for (idx, r) in negative.enumerate() {
            let rank = idx as i64 + 1;
            let run_key = i64::from(r.hour()) - rank;
            let run = runs.entry(run_key).or_insert((r.hour(), 0));
            run.0 = run.0.min(r.hour());
            run.1 += 1;
        }

        let mut day: Vec<NegativeStreak> = runs
            .into_values()
            .map(|(start_hour, length_hours)| NegativeStreak {
                date,
                start_hour,
                length_hours,
            })
            .collect();
        day.sort_by_key(|s| s.start_hour);
        streaks.extend(day);
    }

    streaks
}

/// Longest negative-price run per date. Dates without a negative hour are
/// absent; the aggregator's outer join turns them into `0`.
pub fn longest_streaks(records: &[HourlyRecord]) -> BTreeMap<Date, u32> {
    let mut longest: BTreeMap<Date, u32> = BTreeMap::new();
    for streak in negative_streaks(records) {
        let entry = longest.entry(streak.date).or_insert(0);
        *entry = (*entry).max(streak.length_hours);
    }
    longest
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal::Decimal;
    use time::macros::date;
    use time::{PrimitiveDateTime, Time};

    fn day(date: Date, prices: &[Option<i64>]) -> Vec<HourlyRecord> {
        prices
            .iter()
            .enumerate()
            .map(|(h, p)| HourlyRecord {
                date,
                start_time: PrimitiveDateTime::new(date, Time::from_hms(h as u8, 0, 0).unwrap()),
                production_amount: None,
                consumption_amount: None,
                hourly_price: p.map(Decimal::from),
            })
            .collect()
    }

    fn prices_with_negative(hours: impl Fn(usize) -> bool) -> Vec<Option<i64>> {
        (0..24).map(|h| Some(if hours(h) { -10 } else { 5 })).collect()
    }

    #[test]
    fn picks_the_longest_of_several_runs() {
        let d = date!(2025 - 12 - 30);
        let negative = |h: usize| (5..=9).contains(&h) || (12..=14).contains(&h);
        let records = day(d, &prices_with_negative(negative));

        let streaks = negative_streaks(&records);
        assert_eq!(
            streaks,
            vec![
                NegativeStreak { date: d, start_hour: 5, length_hours: 5 },
                NegativeStreak { date: d, start_hour: 12, length_hours: 3 },
            ]
        );
        assert_eq!(longest_streaks(&records).get(&d), Some(&5));
    }

    #[test]
    fn alternating_hours_are_runs_of_one() {
        let d = date!(2025 - 12 - 31);
        let records = day(d, &prices_with_negative(|h| h % 2 == 0));

        assert_eq!(negative_streaks(&records).len(), 12);
        assert_eq!(longest_streaks(&records).get(&d), Some(&1));
    }

    #[test]
    fn day_without_negative_hours_has_no_entry() {
        let d = date!(2025 - 12 - 29);
        let records = day(d, &prices_with_negative(|_| false));
        assert!(longest_streaks(&records).is_empty());
    }

    #[test]
    fn zero_and_null_prices_break_a_run() {
        let d = date!(2026 - 01 - 01);
        let prices = [Some(-1), Some(-1), Some(0), Some(-1), None, Some(-1), Some(-1), Some(-1)];
        let records = day(d, &prices);
        assert_eq!(longest_streaks(&records).get(&d), Some(&3));
    }

    #[test]
    fn missing_hours_break_a_run() {
        let d = date!(2026 - 01 - 02);
        let mut records = day(d, &[Some(-1); 6]);
        records.remove(3);
        assert_eq!(longest_streaks(&records).get(&d), Some(&3));
        assert_eq!(negative_streaks(&records)[1].start_hour, 4);
    }

    #[test]
    fn rank_restarts_on_every_date_and_input_order_is_irrelevant() {
        let first = date!(2026 - 01 - 03);
        let second = date!(2026 - 01 - 04);
        let mut records = day(first, &prices_with_negative(|h| h >= 20));
        records.extend(day(second, &prices_with_negative(|h| h < 2)));
        records.reverse();

        let longest = longest_streaks(&records);
        assert_eq!(longest.get(&first), Some(&4));
        assert_eq!(longest.get(&second), Some(&2));
    }

    fn naive_longest(prices: &[Option<i64>]) -> u32 {
        let (mut best, mut current) = (0, 0);
        for p in prices {
            if matches!(p, Some(v) if *v < 0) {
                current += 1;
                best = best.max(current);
            } else {
                current = 0;
            }
        }
        best
    }

    proptest! {
        #[test]
        fn longest_streak_matches_a_linear_scan(
            prices in proptest::collection::vec(proptest::option::of(-3i64..3), 24),
        ) {
            let d = date!(2025 - 06 - 01);
            let records = day(d, &prices);
            let found = longest_streaks(&records).get(&d).copied().unwrap_or(0);
            prop_assert_eq!(found, naive_longest(&prices));
        }
    }
}
