//! Payment period model
//!
//! A period is an inclusive `[start, end]` range of calendar days.
//!
//! # Invariants
//!
//! 1. `end >= start`
//! 2. `period_key == start.to_string()` (`YYYY-MM-DD`)
//! 3. `label` always describes the current `start` and `end`

use serde::Serialize;

use crate::core::date::CalendarDate;

/// One billing window
///
/// Fields are private so the invariants above hold for every value; use
/// [`PaymentPeriod::new`] and [`PaymentPeriod::with_end`] to build them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentPeriod {
    start: CalendarDate,
    end: CalendarDate,
    label: String,
    period_key: String,
}

impl PaymentPeriod {
    /// Create a period
    ///
    /// An `end` before `start` collapses to a single-day period on `start`.
    ///
    /// # Example
    /// ```
    /// use payout_cycle_core_rs::{CalendarDate, PaymentPeriod};
    ///
    /// let start = CalendarDate::from_ymd(2024, 3, 10).unwrap();
    /// let period = PaymentPeriod::new(start, start.add_days(10));
    /// assert_eq!(period.period_key(), "2024-03-10");
    /// assert_eq!(period.label(), "Mar 10 - Mar 20, 2024");
    /// assert_eq!(period.length_days(), 11);
    /// ```
    pub fn new(start: CalendarDate, end: CalendarDate) -> Self {
        let end = end.max(start);
        Self {
            start,
            end,
            label: format_label(start, end),
            period_key: start.to_string(),
        }
    }

    /// The same period with a different end
    ///
    /// An end earlier than `start` is ignored and the period is returned
    /// unchanged.
    pub fn with_end(&self, end: CalendarDate) -> Self {
        if end < self.start {
            return self.clone();
        }
        Self::new(self.start, end)
    }

    pub fn start(&self) -> CalendarDate {
        self.start
    }

    pub fn end(&self) -> CalendarDate {
        self.end
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Key under which a payout record for this period is stored
    pub fn period_key(&self) -> &str {
        &self.period_key
    }

    /// Inclusive length in days, at least 1
    pub fn length_days(&self) -> i64 {
        (self.start.days_until(self.end) + 1).max(1)
    }

    /// Whether `date` falls inside the period (inclusive at both ends)
    pub fn contains(&self, date: CalendarDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn format_label(start: CalendarDate, end: CalendarDate) -> String {
    let start_naive = start.naive();
    let end_naive = end.naive();
    if start == end {
        start_naive.format("%b %-d, %Y").to_string()
    } else if start.year() == end.year() {
        format!(
            "{} - {}",
            start_naive.format("%b %-d"),
            end_naive.format("%b %-d, %Y")
        )
    } else {
        format!(
            "{} - {}",
            start_naive.format("%b %-d, %Y"),
            end_naive.format("%b %-d, %Y")
        )
    }
}
