//! Python bindings (feature `pyo3`)
//!
//! The boundary speaks JSON strings only. Callers pass the calendar
//! configuration and record snapshot as JSON and get the serialized
//! `PaymentContext` back.

pub mod resolver;
pub mod types;
