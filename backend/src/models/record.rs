//! Payout record model
//!
//! A payout record describes one historical (or in-flight) cycle. Records are
//! stored externally under a period key (`YYYY-MM-DD`) and handed to the
//! resolver as a read-only snapshot.
//!
//! Lifecycle: a record is created `pending` with a scheduled boundary, later
//! becomes `paid` with a final `cycleEnd`/`nextCycleStart`, or is superseded
//! by a newer record. Nothing in this crate mutates a record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::core::date::{normalize, CalendarDate, DateValue};

/// Records keyed by period key
///
/// Ordered so that every scan visits keys in the same order.
pub type PayoutRecords = BTreeMap<String, PayoutRecord>;

/// Settlement state of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    /// Scheduled but not settled
    Pending,
    /// Settled; boundaries are authoritative
    Paid,
    /// Missing or unrecognized status
    #[default]
    #[serde(other)]
    Unknown,
}

/// A stored payout record
///
/// Only the boundary fields the resolver reads are typed. Everything else
/// the store keeps on the record is carried through untouched in `extra`.
///
/// # Example
/// ```
/// use payout_cycle_core_rs::{CalendarDate, PayoutRecord, RecordStatus};
///
/// let record = PayoutRecord::pending()
///     .with_cycle_start("2024-03-10")
///     .with_scheduled_payment_date("2024-03-20");
///
/// assert_eq!(record.status(), RecordStatus::Pending);
/// assert_eq!(record.cycle_start(), CalendarDate::from_ymd(2024, 3, 10));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRecord {
    #[serde(default)]
    status: RecordStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    cycle_start: Option<DateValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    cycle_end: Option<DateValue>,

    /// End override for pending records, start candidate otherwise
    #[serde(default, skip_serializing_if = "Option::is_none")]
    scheduled_payment_date: Option<DateValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    actual_payment_date: Option<DateValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_payment_date: Option<DateValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_cycle_start: Option<DateValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    next_cycle_end: Option<DateValue>,

    /// Store-specific fields (amounts, notes, ...) kept verbatim
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl PayoutRecord {
    pub fn new(status: RecordStatus) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn pending() -> Self {
        Self::new(RecordStatus::Pending)
    }

    pub fn paid() -> Self {
        Self::new(RecordStatus::Paid)
    }

    pub fn with_cycle_start(mut self, value: impl Into<DateValue>) -> Self {
        self.cycle_start = Some(value.into());
        self
    }

    pub fn with_cycle_end(mut self, value: impl Into<DateValue>) -> Self {
        self.cycle_end = Some(value.into());
        self
    }

    pub fn with_scheduled_payment_date(mut self, value: impl Into<DateValue>) -> Self {
        self.scheduled_payment_date = Some(value.into());
        self
    }

    pub fn with_actual_payment_date(mut self, value: impl Into<DateValue>) -> Self {
        self.actual_payment_date = Some(value.into());
        self
    }

    pub fn with_last_payment_date(mut self, value: impl Into<DateValue>) -> Self {
        self.last_payment_date = Some(value.into());
        self
    }

    pub fn with_next_cycle_start(mut self, value: impl Into<DateValue>) -> Self {
        self.next_cycle_start = Some(value.into());
        self
    }

    pub fn with_next_cycle_end(mut self, value: impl Into<DateValue>) -> Self {
        self.next_cycle_end = Some(value.into());
        self
    }

    /// Attach an opaque store field
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    pub fn status(&self) -> RecordStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == RecordStatus::Pending
    }

    pub fn is_paid(&self) -> bool {
        self.status == RecordStatus::Paid
    }

    pub fn cycle_start(&self) -> Option<CalendarDate> {
        self.cycle_start.as_ref().and_then(normalize)
    }

    pub fn cycle_end(&self) -> Option<CalendarDate> {
        self.cycle_end.as_ref().and_then(normalize)
    }

    pub fn scheduled_payment_date(&self) -> Option<CalendarDate> {
        self.scheduled_payment_date.as_ref().and_then(normalize)
    }

    pub fn actual_payment_date(&self) -> Option<CalendarDate> {
        self.actual_payment_date.as_ref().and_then(normalize)
    }

    pub fn last_payment_date(&self) -> Option<CalendarDate> {
        self.last_payment_date.as_ref().and_then(normalize)
    }

    pub fn next_cycle_start(&self) -> Option<CalendarDate> {
        self.next_cycle_start.as_ref().and_then(normalize)
    }

    pub fn next_cycle_end(&self) -> Option<CalendarDate> {
        self.next_cycle_end.as_ref().and_then(normalize)
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

/// A record together with the key it is stored under
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyedRecord {
    pub key: String,
    pub record: PayoutRecord,
}

impl KeyedRecord {
    pub fn new(key: impl Into<String>, record: PayoutRecord) -> Self {
        Self {
            key: key.into(),
            record,
        }
    }

    /// The key read as a calendar date, if it is one
    pub fn key_date(&self) -> Option<CalendarDate> {
        crate::core::date::normalize_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_camel_case_record() {
        let record: PayoutRecord = serde_json::from_value(json!({
            "status": "paid",
            "cycleStart": "2024-02-01",
            "cycleEnd": "2024-02-29",
            "nextCycleStart": "2024-03-01",
            "amount": 125000
        }))
        .unwrap();

        assert!(record.is_paid());
        assert_eq!(record.cycle_end(), CalendarDate::from_ymd(2024, 2, 29));
        assert_eq!(record.next_cycle_start(), CalendarDate::from_ymd(2024, 3, 1));
        assert_eq!(record.extra().get("amount"), Some(&json!(125000)));
    }

    #[test]
    fn test_unknown_status_and_bad_dates() {
        let record: PayoutRecord = serde_json::from_value(json!({
            "status": "cancelled",
            "cycleStart": "someday"
        }))
        .unwrap();

        assert_eq!(record.status(), RecordStatus::Unknown);
        assert_eq!(record.cycle_start(), None);
    }

    #[test]
    fn test_missing_status_defaults_to_unknown() {
        let record: PayoutRecord = serde_json::from_value(json!({})).unwrap();
        assert_eq!(record.status(), RecordStatus::Unknown);
    }

    #[test]
    fn test_serialize_preserves_extra_fields() {
        let record = PayoutRecord::pending()
            .with_scheduled_payment_date("2024-03-20")
            .with_extra("note", json!("first run"));

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], json!("pending"));
        assert_eq!(value["scheduledPaymentDate"], json!("2024-03-20"));
        assert_eq!(value["note"], json!("first run"));
        assert!(value.get("cycleEnd").is_none());
    }
}
