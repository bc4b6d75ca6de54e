//! Domain models for the payout cycle resolver

pub mod frequency;
pub mod period;
pub mod record;

// Re-exports
pub use frequency::{FrequencyError, PaymentFrequency};
pub use period::PaymentPeriod;
pub use record::{KeyedRecord, PayoutRecord, PayoutRecords, RecordStatus};
