//! Calendar-date value helpers.
//!
//! All scheduling arithmetic runs on [`NaiveDate`]. The [`DateExt`] trait adds
//! the handful of inclusive-day operations the engine needs so that date math
//! never goes through strings.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, TimeDelta, Weekday};
use serde::{Deserialize, Deserializer};

/// Inclusive-day arithmetic on calendar dates
pub trait DateExt: Sized {
    /// Shift by a signed number of calendar days, saturating at the chrono range
    fn add_days(self, days: i64) -> Self;

    /// Signed number of days from `self` to `other` (`other - self`)
    fn days_until(self, other: Self) -> i64;

    /// Number of calendar days in `[self, other]`, 0 when `other < self`
    fn inclusive_days_until(self, other: Self) -> i64;

    /// Saturday or Sunday
    fn is_weekend(self) -> bool;
}

impl DateExt for NaiveDate {
    fn add_days(self, days: i64) -> Self {
        TimeDelta::try_days(days)
            .and_then(|delta| self.checked_add_signed(delta))
            .unwrap_or(if days >= 0 { NaiveDate::MAX } else { NaiveDate::MIN })
    }

    fn days_until(self, other: Self) -> i64 {
        (other - self).num_days()
    }

    fn inclusive_days_until(self, other: Self) -> i64 {
        (self.days_until(other) + 1).max(0)
    }

    fn is_weekend(self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

/// Current local calendar date
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Parse a calendar date leniently.
///
/// Accepts `YYYY-MM-DD`, and full ISO timestamps (`2024-01-01T09:30:00Z`,
/// `2024-01-01T09:30:00`) from which only the date part is kept.
/// Blank or unrecognised input yields `None`.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = chrono::DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(ts.date());
    }
    None
}

/// Serde adapter: optional date that tolerates blanks and garbage.
///
/// Stored project records sometimes carry `""` or free text where a date is
/// expected; those become `None` instead of failing the whole record.
pub fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(|s| {
        let parsed = parse_date(s);
        if parsed.is_none() && !s.trim().is_empty() {
            tracing::warn!(value = s, "ignoring unparsable date");
        }
        parsed
    }))
}
