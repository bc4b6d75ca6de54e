//! Start-override resolvers
//!
//! The current cycle does not always start where the calendar says it does.
//! Payout records can move the start, and the rules for that are checked in
//! a fixed order. Each rule is a plain function that either accepts a start
//! date or passes to the next rule. The first accepted date wins; when no
//! rule accepts, the calendar start stands.
//!
//! # Near-future tolerance
//!
//! Rules 1 and 2 accept a candidate that lies after "today" as long as it is
//! no more than one nominal period length ahead. A cycle that was scheduled
//! a few days early therefore takes effect immediately.

use serde::Serialize;

use crate::core::date::CalendarDate;
use crate::models::frequency::PaymentFrequency;
use crate::models::record::KeyedRecord;
use crate::schedule::reconcile::reference_date;

/// Everything a resolver may look at
#[derive(Debug, Clone, Copy)]
pub struct ResolverInput<'a> {
    pub today: CalendarDate,
    pub frequency: PaymentFrequency,
    pub allow_future_start: bool,
    pub latest: Option<&'a KeyedRecord>,
    pub latest_paid: Option<&'a KeyedRecord>,
}

/// Outcome of one resolver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Accepted(CalendarDate),
    TryNext,
}

/// Which rule produced the start override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartRule {
    /// Latest record is pending: its declared start
    PendingRecord,
    /// Latest paid record's declared `nextCycleStart`
    PaidNextCycleStart,
    /// Day after the latest paid record's `cycleEnd`
    PaidCycleEnd,
    /// Latest record's own reference date
    LatestReferenceDate,
}

pub type StartResolver = fn(&ResolverInput<'_>) -> Resolution;

/// Resolvers in evaluation order
pub const START_RESOLVERS: &[(StartRule, StartResolver)] = &[
    (StartRule::PendingRecord, pending_record_start),
    (StartRule::PaidNextCycleStart, paid_next_cycle_start),
    (StartRule::PaidCycleEnd, paid_cycle_end_roll_forward),
    (StartRule::LatestReferenceDate, latest_reference_date),
];

/// Run the resolvers in order and return the first accepted start
pub fn resolve_start_override(input: &ResolverInput<'_>) -> Option<(StartRule, CalendarDate)> {
    for (rule, resolver) in START_RESOLVERS {
        match resolver(input) {
            Resolution::Accepted(start) => {
                tracing::debug!(rule = ?rule, start = %start, "start override accepted");
                return Some((*rule, start));
            }
            Resolution::TryNext => {
                tracing::trace!(rule = ?rule, "start override rule passed");
            }
        }
    }
    None
}

/// On or before today, or future starts allowed, or inside the tolerance
/// window of one nominal period
pub fn within_tolerance(candidate: CalendarDate, input: &ResolverInput<'_>) -> bool {
    if candidate <= input.today || input.allow_future_start {
        return true;
    }
    let days_ahead = input.today.days_until(candidate);
    (0..=input.frequency.nominal_length_days()).contains(&days_ahead)
}

fn accept_if(candidate: Option<CalendarDate>, accept: impl Fn(CalendarDate) -> bool) -> Resolution {
    match candidate {
        Some(date) if accept(date) => Resolution::Accepted(date),
        _ => Resolution::TryNext,
    }
}

/// Rule 1: a pending latest record starts the cycle at its `cycleStart`, its
/// key, or its `scheduledPaymentDate`, whichever is readable first
pub fn pending_record_start(input: &ResolverInput<'_>) -> Resolution {
    let Some(latest) = input.latest.filter(|latest| latest.record.is_pending()) else {
        return Resolution::TryNext;
    };
    let candidate = latest
        .record
        .cycle_start()
        .or_else(|| latest.key_date())
        .or_else(|| latest.record.scheduled_payment_date());
    accept_if(candidate, |date| within_tolerance(date, input))
}

/// Rule 2: the latest paid record's declared `nextCycleStart`
pub fn paid_next_cycle_start(input: &ResolverInput<'_>) -> Resolution {
    let candidate = input
        .latest_paid
        .and_then(|paid| paid.record.next_cycle_start());
    accept_if(candidate, |date| within_tolerance(date, input))
}

/// Rule 3: the day after the latest paid record's `cycleEnd`, never in the
/// future
pub fn paid_cycle_end_roll_forward(input: &ResolverInput<'_>) -> Resolution {
    let candidate = input
        .latest_paid
        .and_then(|paid| paid.record.cycle_end())
        .map(|end| end.add_days(1));
    accept_if(candidate, |date| date <= input.today)
}

/// Rule 4: the latest record's reference date
///
/// Future dates are accepted only when future starts are allowed or the
/// record is still pending.
pub fn latest_reference_date(input: &ResolverInput<'_>) -> Resolution {
    let Some(latest) = input.latest else {
        return Resolution::TryNext;
    };
    let candidate = reference_date(&latest.key, &latest.record);
    accept_if(candidate, |date| {
        date <= input.today || input.allow_future_start || latest.record.is_pending()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::PayoutRecord;

    fn date(y: i32, m: u32, d: u32) -> CalendarDate {
        CalendarDate::from_ymd(y, m, d).unwrap()
    }

    fn input<'a>(
        today: CalendarDate,
        latest: Option<&'a KeyedRecord>,
        latest_paid: Option<&'a KeyedRecord>,
    ) -> ResolverInput<'a> {
        ResolverInput {
            today,
            frequency: PaymentFrequency::Monthly,
            allow_future_start: false,
            latest,
            latest_paid,
        }
    }

    #[test]
    fn test_tolerance_window_bounds() {
        let today = date(2024, 3, 1);
        let resolver_input = input(today, None, None);
        assert!(within_tolerance(date(2024, 2, 1), &resolver_input));
        assert!(within_tolerance(date(2024, 3, 31), &resolver_input)); // 30 days ahead
        assert!(!within_tolerance(date(2024, 4, 1), &resolver_input)); // 31 days ahead
    }

    #[test]
    fn test_pending_rule_prefers_cycle_start_over_key() {
        let latest = KeyedRecord::new(
            "2024-03-01",
            PayoutRecord::pending().with_cycle_start("2024-03-05"),
        );
        let resolver_input = input(date(2024, 3, 10), Some(&latest), None);
        assert_eq!(
            pending_record_start(&resolver_input),
            Resolution::Accepted(date(2024, 3, 5))
        );
    }

    #[test]
    fn test_pending_rule_falls_back_to_scheduled_date() {
        let today = date(2024, 3, 10);

        let soon = KeyedRecord::new(
            "run-7",
            PayoutRecord::pending().with_scheduled_payment_date("2024-03-25"),
        );
        assert_eq!(
            pending_record_start(&input(today, Some(&soon), None)),
            Resolution::Accepted(date(2024, 3, 25))
        );

        // 36 days ahead is past the 30-day monthly window
        let far = KeyedRecord::new(
            "run-7",
            PayoutRecord::pending().with_scheduled_payment_date("2024-04-15"),
        );
        assert_eq!(
            pending_record_start(&input(today, Some(&far), None)),
            Resolution::TryNext
        );
    }

    #[test]
    fn test_pending_rule_ignores_paid_latest() {
        let latest = KeyedRecord::new("2024-03-01", PayoutRecord::paid());
        let resolver_input = input(date(2024, 3, 10), Some(&latest), Some(&latest));
        assert_eq!(pending_record_start(&resolver_input), Resolution::TryNext);
    }

    #[test]
    fn test_cycle_end_rule_rejects_future() {
        let paid = KeyedRecord::new(
            "2024-03-01",
            PayoutRecord::paid().with_cycle_end("2024-03-30"),
        );
        let resolver_input = input(date(2024, 3, 20), None, Some(&paid));
        assert_eq!(paid_cycle_end_roll_forward(&resolver_input), Resolution::TryNext);

        let later = input(date(2024, 4, 2), None, Some(&paid));
        assert_eq!(
            paid_cycle_end_roll_forward(&later),
            Resolution::Accepted(date(2024, 3, 31))
        );
    }

    #[test]
    fn test_rules_run_in_order() {
        let paid = KeyedRecord::new(
            "2024-02-01",
            PayoutRecord::paid()
                .with_cycle_end("2024-02-29")
                .with_next_cycle_start("2024-03-02"),
        );
        let resolver_input = input(date(2024, 3, 5), Some(&paid), Some(&paid));
        assert_eq!(
            resolve_start_override(&resolver_input),
            Some((StartRule::PaidNextCycleStart, date(2024, 3, 2)))
        );
    }
}
