//! Payout Cycle Core - Rust Engine
//!
//! Deterministic resolution of recurring payout cycles from a billing
//! calendar and a snapshot of historical payout records.
//!
//! # Architecture
//!
//! - **core**: Calendar dates and date normalization
//! - **models**: Domain types (PaymentFrequency, PaymentPeriod, PayoutRecord)
//! - **config**: Calendar configuration and record snapshot loading
//! - **schedule**: Period calculation, record reconciliation, current cycle
//! - **context**: Top-level payment context and its fingerprint
//!
//! # Critical Invariants
//!
//! 1. All dates are whole calendar days (no time-of-day, no timezone math)
//! 2. "Today" is always passed in; nothing reads the system clock
//! 3. Records are read-only; identical inputs give identical contexts
//! 4. Every period satisfies `end >= start` and `period_key == start`
//!
//! # Example
//!
//! ```
//! use payout_cycle_core_rs::{build_context, CalendarConfig, CalendarDate, PayoutRecords};
//!
//! let config = CalendarConfig::from_json(r#"{"paymentType": "weekly", "paymentDay": 5}"#).unwrap();
//! let today = CalendarDate::from_ymd(2024, 3, 13).unwrap(); // Wednesday
//!
//! let context = build_context(&config, &PayoutRecords::new(), today, true);
//! assert_eq!(context.current_period.period_key(), "2024-03-08"); // Friday
//! assert_eq!(context.next_cycle_start.to_string(), "2024-03-15");
//! ```

// Module declarations
pub mod config;
pub mod context;
pub mod core;
pub mod models;
pub mod schedule;

// Re-exports for convenience
pub use config::{parse_records, parse_today, CalendarConfig, ConfigError};
pub use context::{
    build_context, build_context_at, build_context_json, ContextError, PaymentContext,
};
pub use crate::core::date::{normalize, CalendarDate, DateValue};
pub use models::{
    frequency::{FrequencyError, PaymentFrequency},
    period::PaymentPeriod,
    record::{KeyedRecord, PayoutRecord, PayoutRecords, RecordStatus},
};
pub use schedule::{
    build_current_cycle, compute_period, latest_paid_record, latest_record, CurrentCycle,
    StartRule,
};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn payout_cycle_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<ffi::resolver::PyCycleResolver>()?;
    m.add_function(wrap_pyfunction!(ffi::resolver::build_context, m)?)?;
    Ok(())
}
