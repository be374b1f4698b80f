//! Textual date formats accepted and produced by the toggle endpoints.

use chrono::{NaiveDate, NaiveDateTime};

/// Format of `beginning_date`/`expiration_date` in request and response bodies.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format of the `date` query parameter of the by-date listing.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD HH:MM:SS` timestamp.
pub fn parse_date_time(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT).ok()
}

/// Parse a `YYYY-MM-DD` date as midnight of that day.
pub fn parse_date(value: &str) -> Option<NaiveDateTime> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

pub fn format_date_time(value: &NaiveDateTime) -> String {
    value.format(DATE_TIME_FORMAT).to_string()
}

/// Serde adapter rendering timestamps in [`DATE_TIME_FORMAT`].
pub mod date_time_format {
    use super::{format_date_time, parse_date_time, DATE_TIME_FORMAT};
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_date_time(value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_date_time(&raw).ok_or_else(|| {
            de::Error::custom(format!("expected a date in the format {}", DATE_TIME_FORMAT))
        })
    }
}
