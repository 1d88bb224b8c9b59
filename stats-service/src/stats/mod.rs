//! Daily electricity statistics over hourly records.
//!
//! Record source → streak detection ⟂ daily aggregation → join on date →
//! aggregate filter → sort & paginate. Every stage after the fetch is pure.

pub mod daily;
pub mod filter;
pub mod response;
pub mod sort;
pub mod streak;

use electricity_client::domain::{DailySummary, HourlyRecord};
use time::Date;

use crate::sources::{DateWindow, RecordSource, SourceError};
use filter::FilterSet;
use sort::{Page, SortDirection, SortField};

pub const MAX_LIMIT: usize = 500;
pub const DEFAULT_LIMIT: usize = 50;

/// A validated daily stats query.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStatsQuery {
    pub sort_by: SortField,
    pub direction: SortDirection,
    pub filters: FilterSet,
    pub page: Page,
}

impl Default for DailyStatsQuery {
    fn default() -> Self {
        Self {
            sort_by: SortField::default(),
            direction: SortDirection::default(),
            filters: FilterSet::default(),
            page: Page {
                offset: 0,
                limit: DEFAULT_LIMIT,
            },
        }
    }
}

impl DailyStatsQuery {
    /// Date bounds that can be pushed down to the record source.
    pub fn window(&self) -> DateWindow {
        DateWindow {
            start: self.filters.start_date,
            end: self.filters.end_date,
        }
    }
}

/// One page of daily summaries. `total` counts every summary that passed
/// the filters, not just the ones on this page.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStatsPage {
    pub data: Vec<DailySummary>,
    pub total: usize,
}

/// The hourly records of one date, in start-time order.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyStats {
    pub date: Date,
    pub records: Vec<HourlyRecord>,
}

/// Run the pure part of the daily pipeline over already-fetched records.
pub fn daily_stats_from_records(
    records: &[HourlyRecord],
    query: &DailyStatsQuery,
) -> DailyStatsPage {
    let summaries = daily::summarize(records);
    let predicates = query.filters.predicates();
    let matching = filter::apply(summaries, &predicates);
    let total = matching.len();
    let data = sort::sort_and_paginate(matching, query.sort_by, query.direction, query.page);

    tracing::debug!(
        records = records.len(),
        predicates = predicates.len(),
        total,
        returned = data.len(),
        "daily stats computed"
    );

    DailyStatsPage { data, total }
}

/// Fetch the query's window from `source` and summarize it.
pub async fn daily_stats(
    source: &dyn RecordSource,
    query: &DailyStatsQuery,
) -> Result<DailyStatsPage, SourceError> {
    let window = query.window();
    if window.is_empty() {
        return Ok(DailyStatsPage {
            data: Vec::new(),
            total: 0,
        });
    }

    let records = source.hourly_records(window).await?;
    Ok(daily_stats_from_records(&records, query))
}

/// Hourly drill-down for one date. `Ok(None)` means the date has no records.
pub async fn hourly_stats(
    source: &dyn RecordSource,
    date: Date,
) -> Result<Option<HourlyStats>, SourceError> {
    let mut records = source.hourly_records_for_date(date).await?;
    if records.is_empty() {
        return Ok(None);
    }
    records.sort_by_key(|r| r.start_time);

    Ok(Some(HourlyStats { date, records }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::InMemoryRecordSource;
    use rust_decimal::Decimal;
    use time::macros::date;
    use time::{Duration, PrimitiveDateTime, Time};

    /// Seven days from 2025-12-29: day 2 has negative runs 5-9 and 12-14,
    /// day 3 alternates, day 4 has no consumption.
    fn week() -> Vec<HourlyRecord> {
        let base = date!(2025 - 12 - 29);
        let mut rows = Vec::new();
        for d in 0..7 {
            let date = base + Duration::days(d);
            for h in 0..24u8 {
                let mut price = 5;
                if d == 1 && ((5..=9).contains(&h) || (12..=14).contains(&h)) {
                    price = -10;
                }
                if d == 2 && h % 2 == 0 {
                    price = -5;
                }
                rows.push(HourlyRecord {
                    date,
                    start_time: PrimitiveDateTime::new(date, Time::from_hms(h, 0, 0).unwrap()),
                    production_amount: Some(Decimal::from(30000)),
                    consumption_amount: (d != 3).then(|| Decimal::from(4000000)),
                    hourly_price: Some(Decimal::from(price)),
                });
            }
        }
        rows
    }

    #[test]
    fn total_ignores_the_page_window() {
        let records = week();
        for (offset, limit) in [(0, 1), (0, 50), (3, 2), (6, 10), (20, 5)] {
            let query = DailyStatsQuery {
                page: Page { offset, limit },
                ..Default::default()
            };
            let page = daily_stats_from_records(&records, &query);
            assert_eq!(page.total, 7);
            assert_eq!(page.data.len(), 7usize.saturating_sub(offset).min(limit));
        }
    }

    #[test]
    fn filtered_total_counts_all_matching_days() {
        let query = DailyStatsQuery {
            filters: FilterSet {
                min_longest_negative_price_streak_hours: Some(Decimal::ONE),
                ..Default::default()
            },
            page: Page { offset: 0, limit: 1 },
            ..Default::default()
        };
        let page = daily_stats_from_records(&week(), &query);
        assert_eq!(page.total, 2);
        assert_eq!(page.data.len(), 1);
    }

    #[tokio::test]
    async fn inverted_date_window_is_empty_not_an_error() {
        let source = InMemoryRecordSource::new(week());
        let query = DailyStatsQuery {
            filters: FilterSet {
                start_date: Some(date!(2026 - 01 - 03)),
                end_date: Some(date!(2026 - 01 - 01)),
                ..Default::default()
            },
            ..Default::default()
        };
        let page = daily_stats(&source, &query).await.unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn empty_source_gives_empty_page() {
        let source = InMemoryRecordSource::default();
        let page = daily_stats(&source, &DailyStatsQuery::default()).await.unwrap();
        assert_eq!(page, DailyStatsPage { data: vec![], total: 0 });
    }

    #[tokio::test]
    async fn hourly_stats_signals_missing_dates() {
        let source = InMemoryRecordSource::new(week());
        assert!(hourly_stats(&source, date!(2024 - 01 - 01)).await.unwrap().is_none());

        let day = hourly_stats(&source, date!(2025 - 12 - 30)).await.unwrap().unwrap();
        assert_eq!(day.records.len(), 24);
        assert!(day.records.windows(2).all(|w| w[0].start_time < w[1].start_time));
    }
}
