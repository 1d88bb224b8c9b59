//! Wire formats for calendar dates and wall-clock timestamps.
//!
//! Use from struct fields with `#[serde(with = "...")]`, the same way a
//! chrono timestamp helper would be wired in.

use time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, PrimitiveDateTime,
};

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const TIMESTAMP_SPACE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Parse a strict `YYYY-MM-DD` calendar date.
pub fn parse_date(s: &str) -> Result<Date, time::error::Parse> {
    Date::parse(s, DATE_FORMAT)
}

/// Parse `YYYY-MM-DDTHH:MM:SS`, also accepting a space as the separator.
pub fn parse_timestamp(s: &str) -> Result<PrimitiveDateTime, time::error::Parse> {
    PrimitiveDateTime::parse(s, TIMESTAMP_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(s, TIMESTAMP_SPACE_FORMAT))
}

pub fn format_date(date: Date) -> String {
    // The format only holds numeric components, formatting cannot fail.
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

pub fn format_timestamp(ts: PrimitiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).unwrap_or_else(|_| ts.to_string())
}

pub mod date {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_date(*date))
    }

    pub fn deserialize<'de, D>(d: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        super::parse_date(&s).map_err(|e| D::Error::custom(format!("invalid date '{s}': {e}")))
    }
}

pub mod timestamp {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use time::PrimitiveDateTime;

    pub fn serialize<S>(ts: &PrimitiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(*ts))
    }

    pub fn deserialize<'de, D>(d: D) -> Result<PrimitiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        super::parse_timestamp(&s)
            .map_err(|e| D::Error::custom(format!("invalid timestamp '{s}': {e}")))
    }
}
