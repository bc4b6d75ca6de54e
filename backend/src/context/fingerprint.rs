//! Context fingerprinting
//!
//! A SHA-256 digest over the canonical JSON form of a value. Two contexts
//! built from the same inputs hash identically, so callers in different
//! processes can compare results without shipping the whole context.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum ContextError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Context serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Compute the hex SHA-256 of `value` serialized with sorted object keys
///
/// Key order is canonicalized explicitly so the digest does not depend on
/// how serde_json was built.
pub fn compute_fingerprint<T: Serialize>(value: &T) -> Result<String, ContextError> {
    let canonical = canonicalize(serde_json::to_value(value)?);
    let json = serde_json::to_string(&canonical)?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> =
                map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
            Value::Object(sorted.into_iter().collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}
