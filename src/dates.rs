//! Calendar dates as they travel through snapshots, exports and the
//! command line: plain `YYYY-MM-DD` with no time zone.

use serde::{Deserialize, Deserializer, Serializer};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

use crate::errors::TrackerError;

const FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Parses a `YYYY-MM-DD` date.
///
/// ```
/// use tracker::dates::parse_date;
/// assert_eq!(parse_date("2024-03-09").unwrap().to_string(), "2024-03-09");
/// assert!(parse_date("09/03/2024").is_err());
/// ```
pub fn parse_date(s: &str) -> Result<Date, TrackerError> {
    Date::parse(s.trim(), &FORMAT).map_err(|_| TrackerError::InvalidDate(s.to_owned()))
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> String {
    date.format(&FORMAT)
        .unwrap_or_else(|_| date.to_string())
}

/// The instant a calendar date starts, taking the date as UTC.
pub fn start_of(date: Date) -> OffsetDateTime {
    date.midnight().assume_utc()
}

/// Serializes an optional date. Only called for `Some`, since absent
/// dates are skipped.
pub fn serialize_option<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
where S: Serializer {
    match date {
        Some(date) => serializer.serialize_str(&format_date(*date)),
        None => serializer.serialize_none(),
    }
}

/// Deserializes an optional date. An empty string counts as absent,
/// which is what a cleared date input leaves behind.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where D: Deserializer<'de> {
    use serde::de::Error;

    let o: Option<String> = Deserialize::deserialize(deserializer)?;

    match o.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => parse_date(s).map(Some).map_err(D::Error::custom),
    }
}
