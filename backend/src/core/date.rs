//! Calendar dates and date normalization
//!
//! The cycle resolver never looks at time-of-day. All inputs are reduced to a
//! [`CalendarDate`] before any comparison or arithmetic happens, and all
//! arithmetic returns new values instead of mutating existing ones.
//!
//! # Normalization
//!
//! [`normalize`] accepts a [`DateValue`]:
//! - `Date` is taken as-is
//! - `DateTime` keeps its calendar date
//! - `Millis` is an epoch timestamp in milliseconds, read as a UTC date
//! - `Text` is parsed strictly as `YYYY-MM-DD` first, then against a fixed
//!   list of generic formats
//! - `Other` (a stored value of any other shape) is always absent
//!
//! Anything that does not produce a valid date yields `None`. Callers treat
//! `None` as "no information" and move on to their next candidate.

use std::fmt;

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

/// Strict ISO calendar date, parsed without any timezone interpretation
static ISO_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("static regex is valid"));

/// Generic datetime formats tried after RFC 3339, in order
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Generic date-only formats, in order
///
/// `%Y-%m-%d` here catches unpadded input such as `2024-3-5` that the strict
/// pattern refuses.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%d %B %Y"];

/// A date with no time-of-day component
///
/// Ordering and equality are whole-day. Serializes as `YYYY-MM-DD`.
///
/// # Example
/// ```
/// use payout_cycle_core_rs::CalendarDate;
///
/// let date = CalendarDate::from_ymd(2024, 2, 28).unwrap();
/// assert_eq!(date.add_days(1).to_string(), "2024-02-29");
/// assert_eq!(date.days_until(date.add_days(30)), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Build a date from year, month (1-12) and day (1-31)
    ///
    /// Returns `None` for impossible dates such as February 30.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    /// Wrap a chrono date
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    /// The underlying chrono date
    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// Day of week with 0 = Sunday .. 6 = Saturday
    pub fn weekday_from_sunday(&self) -> u32 {
        self.0.weekday().num_days_from_sunday()
    }

    /// Return the date `days` days later (or earlier, when negative)
    ///
    /// Saturates to `self` if the result falls outside chrono's range.
    pub fn add_days(&self, days: i64) -> Self {
        let shifted = if days >= 0 {
            self.0.checked_add_days(Days::new(days.unsigned_abs()))
        } else {
            self.0.checked_sub_days(Days::new(days.unsigned_abs()))
        };
        Self(shifted.unwrap_or(self.0))
    }

    /// Signed number of days from `self` to `other`
    ///
    /// Positive when `other` is later.
    pub fn days_until(&self, other: CalendarDate) -> i64 {
        other.0.signed_duration_since(self.0).num_days()
    }

    /// Number of days in this date's month
    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.year(), self.month())
    }

    /// First day of the previous month
    pub fn first_of_previous_month(&self) -> Self {
        let (year, month) = if self.month() == 1 {
            (self.year() - 1, 12)
        } else {
            (self.year(), self.month() - 1)
        };
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .unwrap_or(*self)
    }

    /// Same month, with the day replaced by `day` capped to the month length
    ///
    /// `day` values below 1 are treated as 1.
    pub fn with_day_clamped(&self, day: u32) -> Self {
        let day = day.clamp(1, self.days_in_month());
        self.0.with_day(day).map(Self).unwrap_or(*self)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Number of days in the given month, 28..=31
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month >= 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

/// A date-like value as it arrives from a record store or caller
///
/// `Date` and `DateTime` are for callers that already hold chrono values.
/// Deserialization never produces them: every string becomes `Text` so
/// stored text goes through the same parser as [`normalize_str`]. Numbers
/// become `Millis` (fractional millis are truncated), and any other JSON
/// shape is kept as `Other` and normalizes to `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DateValue {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Millis(i64),
    Text(String),
    Other(serde_json::Value),
}

/// Shapes a stored date field may take on the wire
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDateValue {
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
    Other(serde_json::Value),
}

impl From<RawDateValue> for DateValue {
    fn from(raw: RawDateValue) -> Self {
        match raw {
            RawDateValue::Millis(millis) => DateValue::Millis(millis),
            RawDateValue::FractionalMillis(millis) if millis.is_finite() => {
                DateValue::Millis(millis.trunc() as i64)
            }
            RawDateValue::FractionalMillis(millis) => {
                DateValue::Other(serde_json::Value::from(millis))
            }
            RawDateValue::Text(text) => DateValue::Text(text),
            RawDateValue::Other(value) => DateValue::Other(value),
        }
    }
}

impl<'de> Deserialize<'de> for DateValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        RawDateValue::deserialize(deserializer).map(DateValue::from)
    }
}

impl DateValue {
    /// Normalize this value, see [`normalize`]
    pub fn normalize(&self) -> Option<CalendarDate> {
        normalize(self)
    }
}

impl From<CalendarDate> for DateValue {
    fn from(date: CalendarDate) -> Self {
        DateValue::Date(date.naive())
    }
}

impl From<NaiveDate> for DateValue {
    fn from(date: NaiveDate) -> Self {
        DateValue::Date(date)
    }
}

impl From<NaiveDateTime> for DateValue {
    fn from(datetime: NaiveDateTime) -> Self {
        DateValue::DateTime(datetime)
    }
}

impl From<&str> for DateValue {
    fn from(text: &str) -> Self {
        DateValue::Text(text.to_string())
    }
}

impl From<String> for DateValue {
    fn from(text: String) -> Self {
        DateValue::Text(text)
    }
}

/// Reduce a date-like value to a [`CalendarDate`]
///
/// Never fails loudly: unparseable input is `None`.
///
/// # Example
/// ```
/// use payout_cycle_core_rs::core::date::{normalize, DateValue};
///
/// let date = normalize(&DateValue::from("2024-03-10")).unwrap();
/// assert_eq!(date.to_string(), "2024-03-10");
///
/// assert!(normalize(&DateValue::from("not a date")).is_none());
/// ```
pub fn normalize(value: &DateValue) -> Option<CalendarDate> {
    match value {
        DateValue::Date(date) => Some(CalendarDate(*date)),
        DateValue::DateTime(datetime) => Some(CalendarDate(datetime.date())),
        DateValue::Millis(millis) => {
            DateTime::from_timestamp_millis(*millis).map(|dt| CalendarDate(dt.date_naive()))
        }
        DateValue::Text(text) => parse_text(text),
        DateValue::Other(value) => {
            tracing::trace!(input = %value, "unreadable date value");
            None
        }
    }
}

/// Normalize a string, see [`normalize`]
pub fn normalize_str(text: &str) -> Option<CalendarDate> {
    parse_text(text)
}

fn parse_text(text: &str) -> Option<CalendarDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = ISO_DATE.captures(text) {
        let year = caps[1].parse().ok()?;
        let month = caps[2].parse().ok()?;
        let day = caps[3].parse().ok()?;
        let parsed = CalendarDate::from_ymd(year, month, day);
        if parsed.is_none() {
            tracing::trace!(input = text, "rejected impossible calendar date");
        }
        return parsed;
    }

    let parsed = parse_generic(text);
    if parsed.is_none() {
        tracing::trace!(input = text, "unparseable date input");
    }
    parsed
}

fn parse_generic(text: &str) -> Option<CalendarDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(CalendarDate(dt.date_naive()));
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
        .map(|dt| CalendarDate(dt.date()))
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
                .map(CalendarDate)
        })
}
