//! Calendar configuration and record snapshot loading
//!
//! The billing configuration store hands over a small camelCase document:
//!
//! ```json
//! { "paymentType": "weekly", "paymentDay": 5, "paymentMethod": "transfer" }
//! ```
//!
//! Every field is optional. Missing fields fall back to monthly, no anchor
//! (frequency default) and `"transfer"`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::date::{normalize_str, CalendarDate};
use crate::models::frequency::PaymentFrequency;
use crate::models::record::PayoutRecords;

/// Payment method used when the configuration does not name one
pub const DEFAULT_PAYMENT_METHOD: &str = "transfer";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Payment day {day} is out of range for {frequency} payments")]
    InvalidPaymentDay {
        frequency: PaymentFrequency,
        day: i64,
    },

    #[error("Invalid date for today: '{0}'")]
    InvalidToday(String),
}

/// Billing calendar settings
///
/// # Example
/// ```
/// use payout_cycle_core_rs::{CalendarConfig, PaymentFrequency};
///
/// let config = CalendarConfig::from_json(r#"{"paymentType": "weekly"}"#).unwrap();
/// assert_eq!(config.payment_type, PaymentFrequency::Weekly);
/// assert_eq!(config.anchor_day(), 5);
/// assert_eq!(config.payment_method, "transfer");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarConfig {
    #[serde(default)]
    pub payment_type: PaymentFrequency,

    /// Day-of-week (weekly) or day-of-month (biweekly, monthly)
    #[serde(default)]
    pub payment_day: Option<i64>,

    /// Opaque to the resolver; passed through to the context
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
}

fn default_payment_method() -> String {
    DEFAULT_PAYMENT_METHOD.to_string()
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            payment_type: PaymentFrequency::default(),
            payment_day: None,
            payment_method: default_payment_method(),
        }
    }
}

impl CalendarConfig {
    pub fn new(payment_type: PaymentFrequency) -> Self {
        Self {
            payment_type,
            ..Self::default()
        }
    }

    pub fn with_payment_day(mut self, day: i64) -> Self {
        self.payment_day = Some(day);
        self
    }

    pub fn with_payment_method(mut self, method: impl Into<String>) -> Self {
        self.payment_method = method.into();
        self
    }

    /// Parse a configuration document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject payment days outside the frequency's natural range
    ///
    /// The resolver itself tolerates such values (it wraps or clamps them);
    /// this is for stores that want to refuse them at write time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.payment_day {
            Some(day) if !self.payment_type.is_valid_anchor(day) => {
                Err(ConfigError::InvalidPaymentDay {
                    frequency: self.payment_type,
                    day,
                })
            }
            _ => Ok(()),
        }
    }

    /// Anchor the calculator will use after defaults and normalization
    pub fn anchor_day(&self) -> u32 {
        self.payment_type.effective_anchor(self.payment_day)
    }
}

/// Parse a record snapshot: an object mapping period keys to records
///
/// A blank document is an empty snapshot.
pub fn parse_records(json: &str) -> Result<PayoutRecords, ConfigError> {
    if json.trim().is_empty() {
        return Ok(PayoutRecords::new());
    }
    Ok(serde_json::from_str(json)?)
}

/// Read the `today` argument supplied by an external caller
///
/// Unlike stored dates, an unreadable `today` is an error: there is no
/// fallback for it.
pub fn parse_today(text: &str) -> Result<CalendarDate, ConfigError> {
    normalize_str(text).ok_or_else(|| ConfigError::InvalidToday(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = CalendarConfig::from_json("{}").unwrap();
        assert_eq!(config, CalendarConfig::default());
        assert_eq!(config.payment_type, PaymentFrequency::Monthly);
        assert_eq!(config.anchor_day(), 1);
    }

    #[test]
    fn test_validate_rejects_weekday_out_of_range() {
        let config = CalendarConfig::new(PaymentFrequency::Weekly).with_payment_day(7);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidPaymentDay { day: 7, .. })
        ));
    }

    #[test]
    fn test_blank_snapshot_is_empty() {
        assert!(parse_records("").unwrap().is_empty());
        assert!(parse_records("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_today() {
        assert_eq!(
            parse_today("2024-03-05").unwrap(),
            CalendarDate::from_ymd(2024, 3, 5).unwrap()
        );
        let err = parse_today("soon").unwrap_err();
        assert_eq!(err.to_string(), "Invalid date for today: 'soon'");
    }

    #[test]
    fn test_unknown_payment_type_is_an_error() {
        assert!(CalendarConfig::from_json(r#"{"paymentType": "yearly"}"#).is_err());
    }
}
