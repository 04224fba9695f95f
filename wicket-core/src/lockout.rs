//! Lockout configuration
//!
//! An account is locked once a failed login brings its consecutive failure count to
//! the lock threshold. The threshold defaults to [`DEFAULT_LOCK_THRESHOLD`] and can be
//! overridden through the builder or the `WICKET_LOCK_THRESHOLD` environment variable.

use std::env::VarError;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of consecutive failed logins that locks an account unless configured otherwise.
pub const DEFAULT_LOCK_THRESHOLD: u32 = 3;

/// Environment variable read by [`LockoutConfig::from_env`].
pub const LOCK_THRESHOLD_ENV: &str = "WICKET_LOCK_THRESHOLD";

/// Configuration for automatic account lockout.
///
/// Serialized as the bare threshold. Deserialization goes through
/// [`LockoutConfig::new`], so a zero threshold is rejected there too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct LockoutConfig {
    lock_threshold: u32,
}

impl Default for LockoutConfig {
    fn default() -> Self {
        Self {
            lock_threshold: DEFAULT_LOCK_THRESHOLD,
        }
    }
}

impl LockoutConfig {
    /// Create a config with the given threshold. The threshold must be positive.
    pub fn new(lock_threshold: u32) -> Result<Self, ValidationError> {
        if lock_threshold == 0 {
            return Err(ValidationError::InvalidLockThreshold(
                "Lock threshold must be at least 1".to_string(),
            ));
        }

        Ok(Self { lock_threshold })
    }

    /// Read the threshold from `WICKET_LOCK_THRESHOLD`, using the default when unset.
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_var(std::env::var(LOCK_THRESHOLD_ENV))
    }

    fn from_var(var: Result<String, VarError>) -> Result<Self, ValidationError> {
        match var {
            Ok(value) => Self::parse(&value),
            Err(VarError::NotPresent) => Ok(Self::default()),
            Err(VarError::NotUnicode(_)) => Err(ValidationError::InvalidLockThreshold(format!(
                "{LOCK_THRESHOLD_ENV} must be valid unicode"
            ))),
        }
    }

    fn parse(value: &str) -> Result<Self, ValidationError> {
        let threshold = value.trim().parse::<u32>().map_err(|_| {
            ValidationError::InvalidLockThreshold(format!(
                "{LOCK_THRESHOLD_ENV} must be a positive integer, got {value:?}"
            ))
        })?;
        Self::new(threshold)
    }

    pub fn lock_threshold(&self) -> u32 {
        self.lock_threshold
    }

    /// Whether an account with this many consecutive failures must be locked.
    pub fn should_lock(&self, failed_attempts: u32) -> bool {
        failed_attempts >= self.lock_threshold
    }
}

impl TryFrom<u32> for LockoutConfig {
    type Error = ValidationError;

    fn try_from(lock_threshold: u32) -> Result<Self, Self::Error> {
        Self::new(lock_threshold)
    }
}

impl From<LockoutConfig> for u32 {
    fn from(config: LockoutConfig) -> Self {
        config.lock_threshold
    }
}

/// Failed attempt count reported with a wrong-password rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptCount {
    pub attempts: u32,
    pub threshold: u32,
}

impl AttemptCount {
    /// Attempts left before the account locks.
    pub fn remaining(&self) -> u32 {
        self.threshold.saturating_sub(self.attempts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_threshold_is_three() {
        assert_eq!(LockoutConfig::default().lock_threshold(), 3);
    }

    #[test]
    fn test_zero_threshold_rejected() {
        assert!(matches!(
            LockoutConfig::new(0),
            Err(ValidationError::InvalidLockThreshold(_))
        ));
        assert_eq!(LockoutConfig::new(5).unwrap().lock_threshold(), 5);
    }

    #[test]
    fn test_should_lock_at_threshold() {
        let config = LockoutConfig::default();
        assert!(!config.should_lock(0));
        assert!(!config.should_lock(2));
        assert!(config.should_lock(3));
        assert!(config.should_lock(4));
    }

    #[test]
    fn test_parse() {
        assert_eq!(LockoutConfig::parse(" 10 ").unwrap().lock_threshold(), 10);
        assert!(LockoutConfig::parse("0").is_err());
        assert!(LockoutConfig::parse("-1").is_err());
        assert!(LockoutConfig::parse("three").is_err());
    }

    #[test]
    fn test_from_var() {
        assert_eq!(
            LockoutConfig::from_var(Err(VarError::NotPresent)).unwrap(),
            LockoutConfig::default()
        );
        assert_eq!(
            LockoutConfig::from_var(Ok("4".to_string()))
                .unwrap()
                .lock_threshold(),
            4
        );
        assert!(matches!(
            LockoutConfig::from_var(Err(VarError::NotUnicode("\u{fffd}".into()))),
            Err(ValidationError::InvalidLockThreshold(_))
        ));
    }

    #[test]
    fn test_deserialize_validates_threshold() {
        use serde::de::{IntoDeserializer, value::Error as DeError};

        let config = LockoutConfig::deserialize(IntoDeserializer::<DeError>::into_deserializer(5u32)).unwrap();
        assert_eq!(config.lock_threshold(), 5);

        let result: Result<LockoutConfig, DeError> =
            LockoutConfig::deserialize(0u32.into_deserializer());
        assert!(result.is_err());

        assert_eq!(LockoutConfig::try_from(0).ok(), None);
        assert_eq!(u32::from(LockoutConfig::default()), 3);
    }

    #[test]
    fn test_remaining_attempts() {
        let count = AttemptCount {
            attempts: 1,
            threshold: 3,
        };
        assert_eq!(count.remaining(), 2);

        let count = AttemptCount {
            attempts: 5,
            threshold: 3,
        };
        assert_eq!(count.remaining(), 0);
    }
}
