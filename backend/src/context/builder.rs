//! Payment context builder
//!
//! Top-level entry point. Builds the current cycle, derives the next one and
//! packages both with the records that shaped them.
//!
//! # Next cycle start
//!
//! First available of:
//! 1. governing record's `nextCycleStart`
//! 2. day after the governing record's `cycleEnd`, when it is paid
//! 3. latest paid record's `nextCycleStart`, when that record is stored under
//!    the current period key
//! 4. day after the current period's end
//!
//! The next cycle ends on the governing record's `nextCycleEnd` when it has
//! one, otherwise it runs for the current interval length.

use serde::Serialize;

use crate::config::{parse_records, parse_today, CalendarConfig};
use crate::context::fingerprint::{compute_fingerprint, ContextError};
use crate::core::date::{normalize, CalendarDate, DateValue};
use crate::models::frequency::PaymentFrequency;
use crate::models::period::PaymentPeriod;
use crate::models::record::{KeyedRecord, PayoutRecords};
use crate::schedule::cycle::{build_current_cycle, CurrentCycle};
use crate::schedule::resolvers::StartRule;

/// Everything a scheduling UI or downstream service needs about the
/// current and next billing windows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentContext {
    pub frequency: PaymentFrequency,
    /// Payment day as configured (not defaulted)
    pub anchor_day: Option<i64>,
    pub preferred_method: String,
    pub current_period: PaymentPeriod,
    pub next_period: PaymentPeriod,
    pub interval_days: i64,
    pub next_cycle_start: CalendarDate,
    pub next_cycle_end: CalendarDate,
    /// Key of the current period
    pub record_key: String,
    pub start_rule: Option<StartRule>,
    pub governing_record: Option<KeyedRecord>,
    pub latest_record: Option<KeyedRecord>,
    pub latest_paid_record: Option<KeyedRecord>,
    pub all_records: PayoutRecords,
}

impl PaymentContext {
    /// Days from `today` until the next cycle starts (negative once it has)
    pub fn days_until_next_cycle(&self, today: CalendarDate) -> i64 {
        today.days_until(self.next_cycle_start)
    }

    /// Hex SHA-256 over the canonical JSON form of this context
    pub fn fingerprint(&self) -> Result<String, ContextError> {
        compute_fingerprint(self)
    }

    /// Serialized camelCase form handed to callers outside Rust
    pub fn to_json(&self) -> Result<String, ContextError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Build the payment context for `today`
///
/// Never fails: missing or unreadable inputs fall back to calendar defaults.
///
/// # Example
/// ```
/// use payout_cycle_core_rs::{
///     build_context, CalendarConfig, CalendarDate, PaymentFrequency, PayoutRecord, PayoutRecords,
/// };
///
/// let mut records = PayoutRecords::new();
/// records.insert(
///     "2024-02-01".into(),
///     PayoutRecord::paid()
///         .with_cycle_start("2024-02-01")
///         .with_cycle_end("2024-02-29")
///         .with_next_cycle_start("2024-03-01"),
/// );
///
/// let config = CalendarConfig::new(PaymentFrequency::Monthly);
/// let today = CalendarDate::from_ymd(2024, 3, 5).unwrap();
/// let context = build_context(&config, &records, today, true);
///
/// assert_eq!(context.current_period.start(), CalendarDate::from_ymd(2024, 3, 1).unwrap());
/// assert_eq!(context.next_cycle_start, CalendarDate::from_ymd(2024, 3, 31).unwrap());
/// ```
pub fn build_context(
    config: &CalendarConfig,
    records: &PayoutRecords,
    today: CalendarDate,
    allow_future_start: bool,
) -> PaymentContext {
    let cycle = build_current_cycle(
        today,
        config.payment_type,
        config.payment_day,
        records,
        allow_future_start,
    );

    let next_cycle_start = next_cycle_start(&cycle);
    let next_cycle_end = next_cycle_end(&cycle, next_cycle_start);

    tracing::debug!(
        frequency = %config.payment_type,
        today = %today,
        current = cycle.period.label(),
        next_start = %next_cycle_start,
        next_end = %next_cycle_end,
        "payment context built"
    );

    PaymentContext {
        frequency: config.payment_type,
        anchor_day: config.payment_day,
        preferred_method: config.payment_method.clone(),
        next_period: PaymentPeriod::new(next_cycle_start, next_cycle_end),
        interval_days: cycle.interval_days,
        next_cycle_start,
        next_cycle_end,
        current_period: cycle.period,
        record_key: cycle.record_key,
        start_rule: cycle.start_rule,
        governing_record: cycle.governing_record,
        latest_record: cycle.latest_record,
        latest_paid_record: cycle.latest_paid_record,
        all_records: records.clone(),
    }
}

/// Like [`build_context`], with `today` given as any date-like value
///
/// Returns `None` only when `today` cannot be read as a date.
pub fn build_context_at(
    config: &CalendarConfig,
    records: &PayoutRecords,
    today: &DateValue,
    allow_future_start: bool,
) -> Option<PaymentContext> {
    let today = normalize(today)?;
    Some(build_context(config, records, today, allow_future_start))
}

/// Build a context entirely from JSON and text inputs, returning it as JSON
///
/// A blank `records_json` means no records.
pub fn build_context_json(
    config_json: &str,
    records_json: &str,
    today: &str,
    allow_future_start: bool,
) -> Result<String, ContextError> {
    let config = CalendarConfig::from_json(config_json)?;
    let records = parse_records(records_json)?;
    let today = parse_today(today)?;
    build_context(&config, &records, today, allow_future_start).to_json()
}

fn next_cycle_start(cycle: &CurrentCycle) -> CalendarDate {
    let governing = cycle.governing_record.as_ref();

    governing
        .and_then(|g| g.record.next_cycle_start())
        .or_else(|| {
            governing
                .filter(|g| g.record.is_paid())
                .and_then(|g| g.record.cycle_end())
                .map(|end| end.add_days(1))
        })
        .or_else(|| {
            cycle
                .latest_paid_record
                .as_ref()
                .filter(|paid| paid.key == cycle.record_key)
                .and_then(|paid| paid.record.next_cycle_start())
        })
        .unwrap_or_else(|| cycle.period.end().add_days(1))
}

fn next_cycle_end(cycle: &CurrentCycle, next_start: CalendarDate) -> CalendarDate {
    cycle
        .governing_record
        .as_ref()
        .and_then(|g| g.record.next_cycle_end())
        .filter(|end| *end >= next_start)
        .unwrap_or_else(|| next_start.add_days(cycle.interval_days - 1))
}
