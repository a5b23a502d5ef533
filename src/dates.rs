//! Date parsing and formatting shared by the view models.
//!
//! The backend has emitted rollout timestamps in several shapes over time
//! (RFC 3339, naive ISO, HTTP dates, bare `YYYY-MM-DD`), so parsing is
//! deliberately lenient. Everything is normalised to UTC.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// The current calendar day in UTC, the same clock rollout dates use.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse a timestamp in any of the formats the backend produces.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Parse a calendar date. Accepts `YYYY-MM-DD` or any full timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .ok()
        .or_else(|| parse_datetime(raw).map(|dt| dt.date_naive()))
}

/// ISO-8601 midnight UTC, the shape the release form submits.
pub fn to_iso_midnight(date: NaiveDate) -> String {
    format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"))
}

/// Millisecond UTC ISO-8601, e.g. `2024-04-02T14:45:00.000Z`.
pub fn to_iso_millis(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `Jan 10, 2024`
pub fn format_display(date: NaiveDate) -> String {
    date.format("%b %d, %Y").to_string()
}

/// Like [`format_display`], with the time appended unless it is midnight.
pub fn format_display_instant(dt: &DateTime<Utc>) -> String {
    if dt.time() == NaiveTime::MIN {
        format_display(dt.date_naive())
    } else {
        dt.format("%b %d, %Y %H:%M UTC").to_string()
    }
}

/// Query-string form used by the metrics endpoints.
pub fn format_query(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// An optionally bounded, inclusive range of calendar days.
///
/// A missing bound admits everything on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// `[today - days, today]`
    pub fn last_days(today: NaiveDate, days: i64) -> Self {
        Self {
            start: Some(today - Duration::days(days)),
            end: Some(today),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.is_none_or(|start| date >= start) && self.end.is_none_or(|end| date <= end)
    }

    pub fn contains_datetime(&self, dt: &DateTime<Utc>) -> bool {
        self.contains(dt.date_naive())
    }
}

pub(crate) fn deserialize_datetime<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_datetime(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp '{}'", raw)))
}

pub(crate) fn serialize_datetime<S>(dt: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&dt.to_rfc3339())
}

pub(crate) fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_date(&raw).ok_or_else(|| serde::de::Error::custom(format!("unrecognised date '{}'", raw)))
}
