//! Cycle Resolution Module
//!
//! Turns a calendar configuration, a reference date and a payout record
//! snapshot into the billing period currently in execution.
//!
//! # Components
//!
//! - **calculator**: nominal period from frequency and anchor
//! - **reconcile**: latest record and latest paid record
//! - **resolvers**: ordered start-override rules
//! - **cycle**: current cycle, with governing-record end overrides
//!
//! # Critical Invariants
//!
//! 1. **Whole days**: every date is a `CalendarDate`; no time-of-day anywhere
//! 2. **Totality**: every function returns a valid period, never an error
//! 3. **Determinism**: identical inputs give identical outputs
//! 4. **Read-only records**: the snapshot is never modified

pub mod calculator;
pub mod cycle;
pub mod reconcile;
pub mod resolvers;

// Re-export public API
pub use calculator::compute_period;
pub use cycle::{build_current_cycle, CurrentCycle};
pub use reconcile::{latest_paid_record, latest_record, reference_date};
pub use resolvers::{resolve_start_override, Resolution, ResolverInput, StartRule};
