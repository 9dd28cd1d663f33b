//! Delivery policy options collected from command flags
//!
//! Every field is independently optional, and "flag not passed" is kept
//! distinct from any concrete value: `retry: Some(0)` is an explicit
//! setting, `None` means the flag never appeared. The builder relies on
//! that distinction to emit only the fields the user touched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from flag-level validation, before any resource is built.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FlagError {
    #[error("invalid backoff policy '{0}': must be one of 'linear', 'exponential'")]
    InvalidBackoffPolicy(String),

    #[error("invalid filter '{0}': expected KEY=VALUE")]
    InvalidFilter(String),
}

/// Retry backoff policy for event delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffPolicy {
    Linear,
    Exponential,
}

impl FromStr for BackoffPolicy {
    type Err = FlagError;

    /// Accepts exactly the wire literals `linear` and `exponential`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linear" => Ok(BackoffPolicy::Linear),
            "exponential" => Ok(BackoffPolicy::Exponential),
            other => Err(FlagError::InvalidBackoffPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for BackoffPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackoffPolicy::Linear => write!(f, "linear"),
            BackoffPolicy::Exponential => write!(f, "exponential"),
        }
    }
}

/// Delivery-policy fields gathered from flags, one `Option` per flag.
///
/// The dead-letter sink is carried as the raw flag string here; resolution
/// into a `Destination` happens in the command handler, where a lookup
/// capability may be available. An empty string means "explicitly clear".
/// Duration-valued fields are opaque strings; the remote schema interprets
/// them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeliveryOptions {
    pub dead_letter_sink: Option<String>,
    pub retry: Option<i32>,
    pub timeout: Option<String>,
    pub backoff_policy: Option<BackoffPolicy>,
    pub backoff_delay: Option<String>,
    pub retry_after_max: Option<String>,
}

impl DeliveryOptions {
    /// True when no delivery flag was passed at all.
    pub fn is_empty(&self) -> bool {
        self.dead_letter_sink.is_none()
            && self.retry.is_none()
            && self.timeout.is_none()
            && self.backoff_policy.is_none()
            && self.backoff_delay.is_none()
            && self.retry_after_max.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_policy_parse() {
        assert_eq!("linear".parse::<BackoffPolicy>(), Ok(BackoffPolicy::Linear));
        assert_eq!(
            "exponential".parse::<BackoffPolicy>(),
            Ok(BackoffPolicy::Exponential)
        );
    }

    #[test]
    fn test_backoff_policy_rejects_wrong_case() {
        let err = "Linear".parse::<BackoffPolicy>().unwrap_err();
        assert_eq!(err, FlagError::InvalidBackoffPolicy("Linear".into()));
        assert!(err.to_string().contains("'linear', 'exponential'"));
    }

    #[test]
    fn test_backoff_policy_rejects_unknown() {
        assert!("random".parse::<BackoffPolicy>().is_err());
    }

    #[test]
    fn test_zero_retry_is_an_explicit_setting() {
        let opts = DeliveryOptions {
            retry: Some(0),
            ..Default::default()
        };
        assert!(!opts.is_empty());
        assert_ne!(opts, DeliveryOptions::default());
    }

    #[test]
    fn test_default_is_empty() {
        assert!(DeliveryOptions::default().is_empty());
    }
}
