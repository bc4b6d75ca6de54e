//! Period calculator
//!
//! Pure function from (reference date, frequency, anchor, optional start
//! override) to a nominal [`PaymentPeriod`]. Records play no part here.
//!
//! | Frequency | Start                                   | Length |
//! |-----------|-----------------------------------------|--------|
//! | daily     | reference date                          | 1      |
//! | weekly    | most recent anchor weekday <= reference | 7      |
//! | biweekly  | most recent anchor day-of-month         | 15     |
//! | monthly   | most recent anchor day-of-month         | 30     |
//!
//! Day-of-month anchors are clamped to the length of the month they land in,
//! so an anchor of 31 lands on Feb 28 (or 29) in February.

use crate::core::date::CalendarDate;
use crate::models::frequency::PaymentFrequency;
use crate::models::period::PaymentPeriod;

/// Compute the nominal period containing `reference`
///
/// `anchor` is the configured payment day; `None` uses the frequency
/// default. `override_start` replaces the computed start for every frequency
/// except daily.
///
/// # Example
/// ```
/// use payout_cycle_core_rs::{compute_period, CalendarDate, PaymentFrequency};
///
/// let today = CalendarDate::from_ymd(2023, 2, 14).unwrap();
/// let period = compute_period(today, PaymentFrequency::Monthly, Some(31), None);
///
/// // Feb 14 has not reached the clamped anchor (Feb 28), so the period
/// // started on the last anchor day, Jan 31
/// assert_eq!(period.start(), CalendarDate::from_ymd(2023, 1, 31).unwrap());
/// assert_eq!(period.length_days(), 30);
/// ```
pub fn compute_period(
    reference: CalendarDate,
    frequency: PaymentFrequency,
    anchor: Option<i64>,
    override_start: Option<CalendarDate>,
) -> PaymentPeriod {
    let anchor = frequency.effective_anchor(anchor);

    let start = match frequency {
        PaymentFrequency::Daily => reference,
        PaymentFrequency::Weekly => {
            override_start.unwrap_or_else(|| weekly_start(reference, anchor))
        }
        PaymentFrequency::Biweekly | PaymentFrequency::Monthly => {
            override_start.unwrap_or_else(|| day_of_month_start(reference, anchor))
        }
    };

    let end = start.add_days(frequency.nominal_length_days() - 1);
    PaymentPeriod::new(start, end)
}

/// Most recent `anchor` weekday on or before `reference` (0 = Sunday)
fn weekly_start(reference: CalendarDate, anchor: u32) -> CalendarDate {
    let days_since_anchor = (reference.weekday_from_sunday() + 7 - anchor % 7) % 7;
    reference.add_days(-i64::from(days_since_anchor))
}

/// Anchor day in the reference month, or in the previous month when the
/// reference day has not reached the (clamped) anchor yet
fn day_of_month_start(reference: CalendarDate, anchor: u32) -> CalendarDate {
    let this_month = reference.with_day_clamped(anchor);
    if reference < this_month {
        reference.first_of_previous_month().with_day_clamped(anchor)
    } else {
        this_month
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    #[test]
    fn test_weekly_start_on_anchor_day() {
        // 2024-03-15 is a Friday
        assert_eq!(weekly_start(date(2024, 3, 15), 5), date(2024, 3, 15));
        assert_eq!(weekly_start(date(2024, 3, 16), 5), date(2024, 3, 15));
        assert_eq!(weekly_start(date(2024, 3, 14), 5), date(2024, 3, 8));
    }

    #[test]
    fn test_day_of_month_start_rolls_back_a_month() {
        assert_eq!(day_of_month_start(date(2024, 3, 5), 10), date(2024, 2, 10));
        assert_eq!(day_of_month_start(date(2024, 3, 10), 10), date(2024, 3, 10));
        assert_eq!(day_of_month_start(date(2024, 1, 5), 10), date(2023, 12, 10));
    }

    #[test]
    fn test_anchor_31_in_february() {
        // Anchor 31 clamps to Feb 28, which the reference has reached
        assert_eq!(day_of_month_start(date(2023, 2, 28), 31), date(2023, 2, 28));
        // Before the clamped anchor the start rolls back to January 31
        assert_eq!(day_of_month_start(date(2023, 2, 14), 31), date(2023, 1, 31));
        // From March the previous month is February, clamped again
        assert_eq!(day_of_month_start(date(2023, 3, 15), 31), date(2023, 2, 28));
        assert_eq!(day_of_month_start(date(2024, 3, 15), 31), date(2024, 2, 29));
    }
}
