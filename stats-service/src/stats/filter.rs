use electricity_client::{domain::DailySummary, serde_formats};
use rust_decimal::Decimal;
use time::Date;

/// Fields of a [`DailySummary`] a predicate can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryField {
    Date,
    TotalProduction,
    TotalConsumption,
    AveragePrice,
    LongestNegativePriceStreakHours,
}

/// The value of a [`SummaryField`] on one summary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue {
    Date(Date),
    Number(Option<Decimal>),
}

impl SummaryField {
    pub fn value(self, summary: &DailySummary) -> FieldValue {
        match self {
            Self::Date => FieldValue::Date(summary.date),
            Self::TotalProduction => FieldValue::Number(summary.total_production),
            Self::TotalConsumption => FieldValue::Number(summary.total_consumption),
            Self::AveragePrice => FieldValue::Number(summary.average_price),
            Self::LongestNegativePriceStreakHours => FieldValue::Number(Some(Decimal::from(
                summary.longest_negative_price_streak_hours,
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Contains,
    AtLeast,
    AtMost,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Text(String),
    Date(Date),
    Number(Decimal),
}

/// One `(field, comparison, operand)` condition on a daily summary.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub field: SummaryField,
    pub comparison: Comparison,
    pub operand: Operand,
}

impl Predicate {
    /// A summary whose referenced value is null never matches a bound, and a
    /// predicate pairing a field with an operand of the wrong kind never
    /// matches either.
    pub fn matches(&self, summary: &DailySummary) -> bool {
        match (self.field.value(summary), self.comparison, &self.operand) {
            (FieldValue::Date(d), Comparison::Contains, Operand::Text(needle)) => {
                serde_formats::format_date(d).contains(needle.as_str())
            }
            (FieldValue::Date(d), Comparison::AtLeast, Operand::Date(bound)) => d >= *bound,
            (FieldValue::Date(d), Comparison::AtMost, Operand::Date(bound)) => d <= *bound,
            (FieldValue::Number(Some(v)), Comparison::AtLeast, Operand::Number(bound)) => {
                v >= *bound
            }
            (FieldValue::Number(Some(v)), Comparison::AtMost, Operand::Number(bound)) => {
                v <= *bound
            }
            _ => false,
        }
    }
}

/// The optional aggregate-level filters of a daily stats query. Absent
/// members impose no constraint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    pub search: Option<String>,
    pub start_date: Option<Date>,
    pub end_date: Option<Date>,
    pub min_production: Option<Decimal>,
    pub max_production: Option<Decimal>,
    pub min_consumption: Option<Decimal>,
    pub max_consumption: Option<Decimal>,
    pub min_average_price: Option<Decimal>,
    pub max_average_price: Option<Decimal>,
    pub min_longest_negative_price_streak_hours: Option<Decimal>,
    pub max_longest_negative_price_streak_hours: Option<Decimal>,
}

impl FilterSet {
    /// Flatten the set into the predicates that are actually present.
    pub fn predicates(&self) -> Vec<Predicate> {
        use Comparison::{AtLeast, AtMost, Contains};
        use SummaryField as F;

        let number = |v: Option<Decimal>| v.map(Operand::Number);
        let date = |v: Option<Date>| v.map(Operand::Date);
        let search = self
            .search
            .as_deref()
            .filter(|s| !s.is_empty())
            .map(|s| Operand::Text(s.to_string()));

        let table = [
            (F::Date, Contains, search),
            (F::Date, AtLeast, date(self.start_date)),
            (F::Date, AtMost, date(self.end_date)),
            (F::TotalProduction, AtLeast, number(self.min_production)),
            (F::TotalProduction, AtMost, number(self.max_production)),
            (F::TotalConsumption, AtLeast, number(self.min_consumption)),
            (F::TotalConsumption, AtMost, number(self.max_consumption)),
            (F::AveragePrice, AtLeast, number(self.min_average_price)),
            (F::AveragePrice, AtMost, number(self.max_average_price)),
            (
                F::LongestNegativePriceStreakHours,
                AtLeast,
                number(self.min_longest_negative_price_streak_hours),
            ),
            (
                F::LongestNegativePriceStreakHours,
                AtMost,
                number(self.max_longest_negative_price_streak_hours),
            ),
        ];

        table
            .into_iter()
            .filter_map(|(field, comparison, operand)| {
                operand.map(|operand| Predicate {
                    field,
                    comparison,
                    operand,
                })
            })
            .collect()
    }
}

/// Keep the summaries satisfying every predicate (logical AND).
pub fn apply(summaries: Vec<DailySummary>, predicates: &[Predicate]) -> Vec<DailySummary> {
    summaries
        .into_iter()
        .filter(|s| predicates.iter().all(|p| p.matches(s)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use time::macros::date;

    fn summary(date: Date, production: Option<Decimal>, streak: u32) -> DailySummary {
        DailySummary {
            date,
            total_production: production,
            total_consumption: Some(dec!(96000)),
            average_price: Some(dec!(5)),
            longest_negative_price_streak_hours: streak,
        }
    }

    fn week() -> Vec<DailySummary> {
        vec![
            summary(date!(2025 - 12 - 29), Some(dec!(720)), 0),
            summary(date!(2025 - 12 - 30), Some(dec!(720)), 5),
            summary(date!(2025 - 12 - 31), Some(dec!(300)), 1),
            summary(date!(2026 - 01 - 01), None, 0),
        ]
    }

    #[test]
    fn empty_filter_set_has_no_predicates() {
        assert!(FilterSet::default().predicates().is_empty());
        let blank = FilterSet {
            search: Some(String::new()),
            ..Default::default()
        };
        assert!(blank.predicates().is_empty());
    }

    #[test]
    fn only_present_bounds_become_predicates() {
        let filters = FilterSet {
            min_production: Some(dec!(500)),
            end_date: Some(date!(2025 - 12 - 31)),
            ..Default::default()
        };
        let predicates = filters.predicates();
        assert_eq!(predicates.len(), 2);
        assert_eq!(predicates[0].field, SummaryField::Date);
        assert_eq!(predicates[1].comparison, Comparison::AtLeast);

        let kept = apply(week(), &predicates);
        let dates: Vec<_> = kept.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![date!(2025 - 12 - 29), date!(2025 - 12 - 30)]);
    }

    #[test]
    fn null_aggregate_never_satisfies_a_bound() {
        let min = FilterSet {
            min_production: Some(dec!(-1000000)),
            ..Default::default()
        };
        let max = FilterSet {
            max_production: Some(dec!(1000000)),
            ..Default::default()
        };
        assert_eq!(apply(week(), &min.predicates()).len(), 3);
        assert_eq!(apply(week(), &max.predicates()).len(), 3);
    }

    #[test]
    fn null_consumption_and_price_fail_both_bounds() {
        let days = vec![
            DailySummary {
                total_consumption: None,
                ..summary(date!(2026 - 01 - 01), Some(dec!(720)), 0)
            },
            DailySummary {
                average_price: None,
                ..summary(date!(2026 - 01 - 02), Some(dec!(720)), 0)
            },
            summary(date!(2026 - 01 - 03), Some(dec!(720)), 0),
        ];
        let kept = |filters: FilterSet| -> Vec<Date> {
            apply(days.clone(), &filters.predicates())
                .iter()
                .map(|s| s.date)
                .collect()
        };

        let consumption = FilterSet {
            min_consumption: Some(dec!(-1000000000)),
            max_consumption: Some(dec!(1000000000)),
            ..Default::default()
        };
        assert_eq!(kept(consumption), vec![date!(2026 - 01 - 02), date!(2026 - 01 - 03)]);

        let price = FilterSet {
            min_average_price: Some(dec!(-1000)),
            max_average_price: Some(dec!(1000)),
            ..Default::default()
        };
        assert_eq!(kept(price), vec![date!(2026 - 01 - 01), date!(2026 - 01 - 03)]);

        let only_max_price = FilterSet {
            max_average_price: Some(dec!(5)),
            ..Default::default()
        };
        assert_eq!(kept(only_max_price).len(), 2);
    }

    #[test]
    fn bounds_are_inclusive() {
        let filters = FilterSet {
            min_longest_negative_price_streak_hours: Some(dec!(1)),
            max_longest_negative_price_streak_hours: Some(dec!(5)),
            start_date: Some(date!(2025 - 12 - 30)),
            end_date: Some(date!(2025 - 12 - 31)),
            ..Default::default()
        };
        assert_eq!(apply(week(), &filters.predicates()).len(), 2);
    }

    #[test]
    fn search_matches_substrings_of_the_iso_date() {
        let by_month = FilterSet {
            search: Some("-12-".to_string()),
            ..Default::default()
        };
        assert_eq!(apply(week(), &by_month.predicates()).len(), 3);

        let by_year = FilterSet {
            search: Some("2026".to_string()),
            ..Default::default()
        };
        assert_eq!(apply(week(), &by_year.predicates()).len(), 1);
    }

    #[test]
    fn mismatched_operand_never_matches() {
        let p = Predicate {
            field: SummaryField::AveragePrice,
            comparison: Comparison::Contains,
            operand: Operand::Text("5".to_string()),
        };
        assert!(!p.matches(&week()[0]));
    }
}
