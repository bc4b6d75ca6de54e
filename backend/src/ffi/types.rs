//! Error mapping for the FFI boundary
//!
//! Parsing lives in `config` and `context`; this module only decides which
//! Python exception each failure becomes. Bad input raises `ValueError`,
//! a failed serialization raises `RuntimeError`.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::config::ConfigError;
use crate::context::ContextError;

pub fn config_error(err: ConfigError) -> PyErr {
    PyErr::new::<PyValueError, _>(err.to_string())
}

pub fn context_error(err: ContextError) -> PyErr {
    match err {
        ContextError::Config(err) => config_error(err),
        other => PyErr::new::<PyRuntimeError, _>(other.to_string()),
    }
}
