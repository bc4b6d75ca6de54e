//! Current cycle builder
//!
//! Combines the period calculator with the record snapshot:
//!
//! 1. Reconcile the latest record and the latest paid record
//! 2. Run the start-override resolvers (see [`crate::schedule::resolvers`])
//! 3. Compute the period from today with the resolved start, if any
//! 4. Look up a record stored under the resolved period key (the governing
//!    record) and let it move the period end:
//!    - `paid` with `cycleEnd`: the declared end is final
//!    - otherwise `scheduledPaymentDate`: the expected close of the cycle
//!
//! The result always holds a valid period; every unreadable date only
//! means one fewer candidate.

use serde::Serialize;

use crate::core::date::CalendarDate;
use crate::models::frequency::PaymentFrequency;
use crate::models::period::PaymentPeriod;
use crate::models::record::{KeyedRecord, PayoutRecords};
use crate::schedule::calculator::compute_period;
use crate::schedule::reconcile::{latest_paid_record, latest_record};
use crate::schedule::resolvers::{resolve_start_override, ResolverInput, StartRule};

/// The cycle currently in execution
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentCycle {
    pub period: PaymentPeriod,
    /// Period key of `period`
    pub record_key: String,
    /// Inclusive length of `period` in days, at least 1
    pub interval_days: i64,
    /// Rule that moved the start, if any
    pub start_rule: Option<StartRule>,
    pub governing_record: Option<KeyedRecord>,
    pub latest_record: Option<KeyedRecord>,
    pub latest_paid_record: Option<KeyedRecord>,
}

/// Build the current cycle for `today`
///
/// # Example
/// ```
/// use payout_cycle_core_rs::{build_current_cycle, CalendarDate, PaymentFrequency, PayoutRecords};
///
/// let today = CalendarDate::from_ymd(2024, 6, 1).unwrap();
/// let cycle = build_current_cycle(today, PaymentFrequency::Daily, None, &PayoutRecords::new(), true);
///
/// assert_eq!(cycle.period.start(), today);
/// assert_eq!(cycle.period.end(), today);
/// assert_eq!(cycle.interval_days, 1);
/// assert!(cycle.governing_record.is_none());
/// ```
pub fn build_current_cycle(
    today: CalendarDate,
    frequency: PaymentFrequency,
    anchor: Option<i64>,
    records: &PayoutRecords,
    allow_future_start: bool,
) -> CurrentCycle {
    let latest = latest_record(records);
    let latest_paid = latest_paid_record(records);

    let input = ResolverInput {
        today,
        frequency,
        allow_future_start,
        latest: latest.as_ref(),
        latest_paid: latest_paid.as_ref(),
    };
    let start_override = resolve_start_override(&input);

    let base = compute_period(
        today,
        frequency,
        anchor,
        start_override.map(|(_, start)| start),
    );

    let record_key = base.period_key().to_string();
    let governing = records
        .get(&record_key)
        .map(|record| KeyedRecord::new(record_key.clone(), record.clone()));

    let period = match &governing {
        Some(governing) => apply_governing_end(base, governing),
        None => base,
    };

    CurrentCycle {
        interval_days: period.length_days(),
        period,
        record_key,
        start_rule: start_override.map(|(rule, _)| rule),
        governing_record: governing,
        latest_record: latest,
        latest_paid_record: latest_paid,
    }
}

/// Let the governing record replace the nominal end
fn apply_governing_end(period: PaymentPeriod, governing: &KeyedRecord) -> PaymentPeriod {
    let record = &governing.record;
    let declared_end = match record.cycle_end() {
        Some(end) if record.is_paid() => Some(end),
        _ => record.scheduled_payment_date(),
    };

    match declared_end {
        Some(end) if end >= period.start() => {
            tracing::debug!(
                key = %governing.key,
                nominal_end = %period.end(),
                end = %end,
                "governing record sets period end"
            );
            period.with_end(end)
        }
        Some(end) => {
            tracing::debug!(
                key = %governing.key,
                end = %end,
                "ignoring governing end before period start"
            );
            period
        }
        None => period,
    }
}
