//! Record reconciliation
//!
//! Picks the most recent record out of an unordered, possibly sparse record
//! snapshot. "Most recent" is judged by each record's reference date: the
//! first of these that normalizes to a calendar date.
//!
//! 1. `actualPaymentDate`
//! 2. `lastPaymentDate`
//! 3. `scheduledPaymentDate`
//! 4. `cycleEnd`
//! 5. `cycleStart`
//! 6. the key the record is stored under
//!
//! Records with no usable date at all are skipped. On an exact tie the
//! record visited last (the greater key) wins.

use crate::core::date::{normalize_str, CalendarDate};
use crate::models::record::{KeyedRecord, PayoutRecord, PayoutRecords};

/// Reference date of a record stored under `key`
pub fn reference_date(key: &str, record: &PayoutRecord) -> Option<CalendarDate> {
    record
        .actual_payment_date()
        .or_else(|| record.last_payment_date())
        .or_else(|| record.scheduled_payment_date())
        .or_else(|| record.cycle_end())
        .or_else(|| record.cycle_start())
        .or_else(|| normalize_str(key))
}

/// Record with the latest reference date, any status
///
/// # Example
/// ```
/// use payout_cycle_core_rs::{latest_record, PayoutRecord, PayoutRecords};
///
/// let mut records = PayoutRecords::new();
/// records.insert("2024-02-01".into(), PayoutRecord::paid().with_cycle_end("2024-02-29"));
/// records.insert("2024-03-01".into(), PayoutRecord::pending());
///
/// let latest = latest_record(&records).unwrap();
/// assert_eq!(latest.key, "2024-03-01");
/// ```
pub fn latest_record(records: &PayoutRecords) -> Option<KeyedRecord> {
    latest_matching(records, |_| true)
}

/// Record with the latest reference date among `paid` records
pub fn latest_paid_record(records: &PayoutRecords) -> Option<KeyedRecord> {
    latest_matching(records, PayoutRecord::is_paid)
}

fn latest_matching<F>(records: &PayoutRecords, include: F) -> Option<KeyedRecord>
where
    F: Fn(&PayoutRecord) -> bool,
{
    let mut best: Option<(CalendarDate, &String, &PayoutRecord)> = None;

    for (key, record) in records {
        if !include(record) {
            continue;
        }
        let Some(date) = reference_date(key, record) else {
            continue;
        };
        let replace = match best {
            Some((best_date, _, _)) => date >= best_date,
            None => true,
        };
        if replace {
            best = Some((date, key, record));
        }
    }

    best.map(|(_, key, record)| KeyedRecord::new(key.clone(), record.clone()))
}
