use std::cmp::Ordering;

use electricity_client::domain::DailySummary;

/// The closed set of fields daily summaries can be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Date,
    TotalProduction,
    TotalConsumption,
    AveragePrice,
    LongestNegativePriceStreakHours,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Compare two nullable values. Ascending puts nulls first, descending puts
/// them last; equal values compare `Equal` in both directions.
fn nullable<T: Ord>(a: Option<T>, b: Option<T>, direction: SortDirection) -> Ordering {
    let ascending = match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => x.cmp(&y),
    };
    match direction {
        SortDirection::Asc => ascending,
        SortDirection::Desc => ascending.reverse(),
    }
}

impl SortField {
    pub fn compare(self, a: &DailySummary, b: &DailySummary, direction: SortDirection) -> Ordering {
        match self {
            Self::Date => nullable(Some(a.date), Some(b.date), direction),
            Self::TotalProduction => nullable(a.total_production, b.total_production, direction),
            Self::TotalConsumption => nullable(a.total_consumption, b.total_consumption, direction),
            Self::AveragePrice => nullable(a.average_price, b.average_price, direction),
            Self::LongestNegativePriceStreakHours => nullable(
                Some(a.longest_negative_price_streak_hours),
                Some(b.longest_negative_price_streak_hours),
                direction,
            ),
        }
    }
}

/// A contiguous window over the sorted sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub offset: usize,
    pub limit: usize,
}

impl Page {
    /// Every item from the start; for offline reports that print the whole
    /// sequence.
    pub fn unbounded() -> Self {
        Self {
            offset: 0,
            limit: usize::MAX,
        }
    }
}

/// Stable sort by `field`, then slice out `page`. An offset past the end
/// yields an empty page.
pub fn sort_and_paginate(
    mut summaries: Vec<DailySummary>,
    field: SortField,
    direction: SortDirection,
    page: Page,
) -> Vec<DailySummary> {
    summaries.sort_by(|a, b| field.compare(a, b, direction));
    summaries.into_iter().skip(page.offset).take(page.limit).collect()
}
