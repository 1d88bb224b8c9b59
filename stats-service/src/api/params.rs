//! Query parameter validation for the stats endpoints.
//!
//! Everything arrives as raw strings and is turned into a closed, typed
//! query here. Nothing past this module sees an unvalidated field name.

use std::str::FromStr;

use electricity_client::serde_formats;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use time::Date;

use crate::stats::{
    filter::FilterSet,
    sort::{Page, SortDirection, SortField},
    DailyStatsQuery, MAX_LIMIT,
};

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid `{param}`: {reason}")]
pub struct ValidationError {
    pub param: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(param: &'static str, reason: impl Into<String>) -> Self {
        Self {
            param,
            reason: reason.into(),
        }
    }
}

/// `GET /stats` query string before validation.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStatsParams {
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
    pub search: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
    pub filters: Option<String>,
}

/// The `filters` JSON object. Unknown keys are rejected.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawFilters {
    #[serde(default, deserialize_with = "optional_text")]
    start_date: Option<String>,
    #[serde(default, deserialize_with = "optional_text")]
    end_date: Option<String>,
    #[serde(default, deserialize_with = "optional_decimal")]
    min_production: Option<Decimal>,
    #[serde(default, deserialize_with = "optional_decimal")]
    max_production: Option<Decimal>,
    #[serde(default, deserialize_with = "optional_decimal")]
    min_consumption: Option<Decimal>,
    #[serde(default, deserialize_with = "optional_decimal")]
    max_consumption: Option<Decimal>,
    #[serde(default, deserialize_with = "optional_decimal")]
    min_average_price: Option<Decimal>,
    #[serde(default, deserialize_with = "optional_decimal")]
    max_average_price: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "optional_decimal",
        alias = "minLongestNegativeHours",
        alias = "minLongestNegativePriceHours"
    )]
    min_longest_negative_price_streak_hours: Option<Decimal>,
    #[serde(
        default,
        deserialize_with = "optional_decimal",
        alias = "maxLongestNegativeHours",
        alias = "maxLongestNegativePriceHours"
    )]
    max_longest_negative_price_streak_hours: Option<Decimal>,
}

/// Blank strings and nulls count as absent.
fn optional_text<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(d)?;
    Ok(value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()))
}

/// Accept JSON numbers and numeric strings; blank strings and nulls count
/// as absent.
fn optional_decimal<'de, D>(d: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value;

    let text = match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => return Err(D::Error::custom(format!("expected a number, got {other}"))),
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .map(Some)
        .map_err(|_| D::Error::custom(format!("'{text}' is not a number")))
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub fn parse_sort_field(s: &str) -> Result<SortField, ValidationError> {
    match s {
        "date" => Ok(SortField::Date),
        "totalProduction" => Ok(SortField::TotalProduction),
        "totalConsumption" => Ok(SortField::TotalConsumption),
        "averagePrice" => Ok(SortField::AveragePrice),
        "longestNegativePriceStreakHours" | "longestNegativeHours" => {
            Ok(SortField::LongestNegativePriceStreakHours)
        }
        other => Err(ValidationError::new(
            "sortBy",
            format!("unknown sort field '{other}'"),
        )),
    }
}

pub fn parse_sort_direction(s: &str) -> Result<SortDirection, ValidationError> {
    match s {
        "asc" => Ok(SortDirection::Asc),
        "desc" => Ok(SortDirection::Desc),
        other => Err(ValidationError::new(
            "sortDirection",
            format!("expected 'asc' or 'desc', got '{other}'"),
        )),
    }
}

/// A strict `YYYY-MM-DD` calendar date.
pub fn parse_date(param: &'static str, s: &str) -> Result<Date, ValidationError> {
    serde_formats::parse_date(s)
        .map_err(|_| ValidationError::new(param, format!("'{s}' is not a YYYY-MM-DD date")))
}

fn parse_integer(param: &'static str, s: &str) -> Result<i64, ValidationError> {
    s.parse::<i64>()
        .map_err(|_| ValidationError::new(param, format!("'{s}' is not an integer")))
}

fn parse_filters(
    raw: Option<String>,
    search: Option<String>,
) -> Result<FilterSet, ValidationError> {
    use serde_json::Value;

    let invalid = |e: serde_json::Error| ValidationError::new("filters", e.to_string());
    let parsed: RawFilters = match raw {
        Some(json) => match serde_json::from_str::<Value>(&json).map_err(invalid)? {
            object @ Value::Object(_) => serde_json::from_value(object).map_err(invalid)?,
            _ => return Err(ValidationError::new("filters", "expected a JSON object")),
        },
        None => RawFilters::default(),
    };

    Ok(FilterSet {
        search,
        start_date: parsed
            .start_date
            .as_deref()
            .map(|s| parse_date("filters.startDate", s))
            .transpose()?,
        end_date: parsed
            .end_date
            .as_deref()
            .map(|s| parse_date("filters.endDate", s))
            .transpose()?,
        min_production: parsed.min_production,
        max_production: parsed.max_production,
        min_consumption: parsed.min_consumption,
        max_consumption: parsed.max_consumption,
        min_average_price: parsed.min_average_price,
        max_average_price: parsed.max_average_price,
        min_longest_negative_price_streak_hours: parsed.min_longest_negative_price_streak_hours,
        max_longest_negative_price_streak_hours: parsed.max_longest_negative_price_streak_hours,
    })
}

/// Validate a `GET /stats` query string. `default_limit` applies when
/// `limit` is absent.
pub fn parse_stats_query(
    raw: RawStatsParams,
    default_limit: usize,
) -> Result<DailyStatsQuery, ValidationError> {
    let sort_by = blank_to_none(raw.sort_by)
        .map(|s| parse_sort_field(&s))
        .transpose()?
        .unwrap_or_default();
    let direction = blank_to_none(raw.sort_direction)
        .map(|s| parse_sort_direction(&s))
        .transpose()?
        .unwrap_or_default();

    let limit = match blank_to_none(raw.limit) {
        Some(s) => {
            let n = parse_integer("limit", &s)?;
            if !(1..=MAX_LIMIT as i64).contains(&n) {
                return Err(ValidationError::new(
                    "limit",
                    format!("must be within 1..={MAX_LIMIT}"),
                ));
            }
            n as usize
        }
        None => default_limit,
    };
    let offset = match blank_to_none(raw.offset) {
        Some(s) => {
            let n = parse_integer("offset", &s)?;
            usize::try_from(n).map_err(|_| ValidationError::new("offset", "must not be negative"))?
        }
        None => 0,
    };

    let search = blank_to_none(raw.search);
    let filters = parse_filters(blank_to_none(raw.filters), search)?;

    Ok(DailyStatsQuery {
        sort_by,
        direction,
        filters,
        page: Page { offset, limit },
    })
}
