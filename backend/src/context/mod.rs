//! Payment context - the resolver's public result
//!
//! See `builder.rs` for next-cycle derivation and `fingerprint.rs` for the
//! canonical digest.

pub mod builder;
pub mod fingerprint;

// Re-export main types for convenience
pub use builder::{build_context, build_context_at, build_context_json, PaymentContext};
pub use fingerprint::{compute_fingerprint, ContextError};
