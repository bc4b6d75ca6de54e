//! PyO3 wrapper for the cycle resolver
//!
//! # Example (from Python)
//!
//! ```python
//! from payout_cycle_core_rs import CycleResolver, build_context
//!
//! resolver = CycleResolver('{"paymentType": "monthly", "paymentDay": 1}', records_json)
//! context = json.loads(resolver.context("2024-03-05"))
//! print(context["currentPeriod"]["label"])
//!
//! # One-shot form
//! context_json = build_context(config_json, records_json, "2024-03-05")
//! ```

use pyo3::prelude::*;

use super::types::{config_error, context_error};
use crate::config::{parse_records, parse_today, CalendarConfig};
use crate::context::{build_context as rust_build_context, build_context_json};
use crate::models::record::PayoutRecords;

/// Holds a parsed configuration and record snapshot so repeated queries for
/// different days skip re-parsing
#[pyclass(name = "CycleResolver")]
pub struct PyCycleResolver {
    config: CalendarConfig,
    records: PayoutRecords,
}

#[pymethods]
impl PyCycleResolver {
    /// Raises ValueError on malformed JSON
    #[new]
    #[pyo3(signature = (config_json, records_json = ""))]
    fn new(config_json: &str, records_json: &str) -> PyResult<Self> {
        Ok(Self {
            config: CalendarConfig::from_json(config_json).map_err(config_error)?,
            records: parse_records(records_json).map_err(config_error)?,
        })
    }

    /// Serialized `PaymentContext` for `today`
    #[pyo3(signature = (today, allow_future_start = true))]
    fn context(&self, today: &str, allow_future_start: bool) -> PyResult<String> {
        let today = parse_today(today).map_err(config_error)?;
        rust_build_context(&self.config, &self.records, today, allow_future_start)
            .to_json()
            .map_err(context_error)
    }

    /// Canonical SHA-256 of the context for `today`
    #[pyo3(signature = (today, allow_future_start = true))]
    fn fingerprint(&self, today: &str, allow_future_start: bool) -> PyResult<String> {
        let today = parse_today(today).map_err(config_error)?;
        rust_build_context(&self.config, &self.records, today, allow_future_start)
            .fingerprint()
            .map_err(context_error)
    }

    fn record_count(&self) -> usize {
        self.records.len()
    }
}

/// One-shot context build over JSON inputs
#[pyfunction]
#[pyo3(signature = (config_json, records_json, today, allow_future_start = true))]
pub fn build_context(
    config_json: &str,
    records_json: &str,
    today: &str,
    allow_future_start: bool,
) -> PyResult<String> {
    build_context_json(config_json, records_json, today, allow_future_start).map_err(context_error)
}
