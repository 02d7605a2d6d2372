//! Date helper functions

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use chrono_tz::Tz;
use thiserror::Error;

/// chrono pattern for `dd Mon yyyy`, lowercased after formatting
pub const PUBLICATION_DATE_FORMAT: &str = "%d %b %Y";

/// What to do when a document carries no publication date
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingDate {
    /// Render this text in place of the date
    Placeholder(String),
    /// Treat the document as unrenderable
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DateError {
    #[error("publication date is missing")]
    Missing,
    #[error("invalid publication date: {0:?}")]
    Invalid(String),
}

/// Parse a CMS timestamp.
///
/// Accepts RFC 3339 (`2021-03-15T00:00:00+00:00`), the compact offset form the
/// CMS emits (`2021-03-15T00:00:00+0000`) and bare dates, which are taken as
/// midnight UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    DateTime::parse_from_rfc3339(value)
        .ok()
        .or_else(|| DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f%z").ok())
        .or_else(|| {
            let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
            let midnight = date.and_hms_opt(0, 0, 0)?;
            Some(FixedOffset::east_opt(0)?.from_utc_datetime(&midnight))
        })
}

/// Format a date as `dd mon yyyy` (e.g. "15 mar 2021")
pub fn format_date<Z: TimeZone>(date: &DateTime<Z>) -> String
where
    Z::Offset: std::fmt::Display,
{
    date.format(PUBLICATION_DATE_FORMAT)
        .to_string()
        .to_lowercase()
}

/// Format a date in ISO 8601 / XML format, for `<time datetime>`
pub fn date_xml<Z: TimeZone>(date: &DateTime<Z>) -> String
where
    Z::Offset: std::fmt::Display,
{
    date.format("%Y-%m-%dT%H:%M:%S%:z").to_string()
}

/// Format a nullable publication timestamp for display.
///
/// The day is taken in `timezone` when given, otherwise in the offset the
/// timestamp carries.
pub fn format_publication_date(
    timestamp: Option<&str>,
    missing: &MissingDate,
    timezone: Option<Tz>,
) -> Result<String, DateError> {
    let Some(raw) = timestamp.filter(|t| !t.trim().is_empty()) else {
        return match missing {
            MissingDate::Placeholder(text) => Ok(text.clone()),
            MissingDate::Fail => Err(DateError::Missing),
        };
    };

    let date = parse_timestamp(raw).ok_or_else(|| DateError::Invalid(raw.to_string()))?;

    Ok(match timezone {
        Some(tz) => format_date(&date.with_timezone(&tz)),
        None => format_date(&date),
    })
}
