//! Payment frequency and anchor day
//!
//! The frequency decides two things: how an anchor day is read (day-of-week
//! for weekly, day-of-month for biweekly and monthly, ignored for daily) and
//! the nominal length of a period.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Default weekly anchor: Friday
pub const DEFAULT_WEEKLY_ANCHOR: u32 = 5;

/// Default day-of-month anchor
pub const DEFAULT_MONTHLY_ANCHOR: u32 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrequencyError {
    #[error("Unknown payment frequency '{0}'")]
    Unknown(String),
}

/// How often a payout cycle repeats
///
/// Deserializes case-insensitively through [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentFrequency {
    Daily,
    Weekly,
    Biweekly,
    #[default]
    Monthly,
}

impl PaymentFrequency {
    /// Nominal period length in days: 1, 7, 15 or 30
    pub fn nominal_length_days(&self) -> i64 {
        match self {
            PaymentFrequency::Daily => 1,
            PaymentFrequency::Weekly => 7,
            PaymentFrequency::Biweekly => 15,
            PaymentFrequency::Monthly => 30,
        }
    }

    /// Anchor used when the configuration leaves it out
    pub fn default_anchor(&self) -> u32 {
        match self {
            PaymentFrequency::Weekly => DEFAULT_WEEKLY_ANCHOR,
            _ => DEFAULT_MONTHLY_ANCHOR,
        }
    }

    /// Resolve a configured anchor into the value the calculator uses
    ///
    /// Weekly anchors wrap into 0..=6 (0 = Sunday). Day-of-month anchors are
    /// held to 1..=31; the per-month clamp happens later against the target
    /// month. Daily ignores the anchor entirely.
    pub fn effective_anchor(&self, anchor: Option<i64>) -> u32 {
        let Some(anchor) = anchor else {
            return self.default_anchor();
        };
        match self {
            PaymentFrequency::Weekly => anchor.rem_euclid(7) as u32,
            PaymentFrequency::Biweekly | PaymentFrequency::Monthly => anchor.clamp(1, 31) as u32,
            PaymentFrequency::Daily => self.default_anchor(),
        }
    }

    /// Whether `anchor` is in range for this frequency without any wrapping
    pub fn is_valid_anchor(&self, anchor: i64) -> bool {
        match self {
            PaymentFrequency::Daily => true,
            PaymentFrequency::Weekly => (0..=6).contains(&anchor),
            PaymentFrequency::Biweekly | PaymentFrequency::Monthly => (1..=31).contains(&anchor),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentFrequency::Daily => "daily",
            PaymentFrequency::Weekly => "weekly",
            PaymentFrequency::Biweekly => "biweekly",
            PaymentFrequency::Monthly => "monthly",
        }
    }
}

impl fmt::Display for PaymentFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentFrequency {
    type Err = FrequencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(PaymentFrequency::Daily),
            "weekly" => Ok(PaymentFrequency::Weekly),
            "biweekly" | "bi-weekly" | "fortnightly" => Ok(PaymentFrequency::Biweekly),
            "monthly" => Ok(PaymentFrequency::Monthly),
            _ => Err(FrequencyError::Unknown(s.to_string())),
        }
    }
}

impl<'de> Deserialize<'de> for PaymentFrequency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_anchor_defaults() {
        assert_eq!(PaymentFrequency::Weekly.effective_anchor(None), 5);
        assert_eq!(PaymentFrequency::Monthly.effective_anchor(None), 1);
        assert_eq!(PaymentFrequency::Biweekly.effective_anchor(None), 1);
    }

    #[test]
    fn test_effective_anchor_normalizes_out_of_range() {
        assert_eq!(PaymentFrequency::Weekly.effective_anchor(Some(9)), 2);
        assert_eq!(PaymentFrequency::Weekly.effective_anchor(Some(-1)), 6);
        assert_eq!(PaymentFrequency::Monthly.effective_anchor(Some(40)), 31);
        assert_eq!(PaymentFrequency::Monthly.effective_anchor(Some(0)), 1);
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!("Weekly".parse(), Ok(PaymentFrequency::Weekly));
        assert_eq!("bi-weekly".parse(), Ok(PaymentFrequency::Biweekly));
        assert!("yearly".parse::<PaymentFrequency>().is_err());
    }
}
