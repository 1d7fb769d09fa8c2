//! Resilience policy for a single protected call site.

use crate::core::error::DomainError;
use std::time::Duration;

/// Substitute response returned when resilience safeguards trip.
pub const DEFAULT_FALLBACK_TEXT: &str = "I'm experiencing difficulties. Please try again later.";

/// Timeout, retry and circuit breaker settings (Value Object).
///
/// Backoff before retry `k + 1` (with `k` the 0-indexed failed attempt) is
/// `backoff_unit * backoff_base^k`, optionally capped by `max_backoff`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResiliencePolicy {
    /// Retries after the initial attempt.
    pub max_retries: u32,
    pub backoff_base: u32,
    /// Unit the exponential backoff is expressed in (one second by default).
    pub backoff_unit: Duration,
    pub max_backoff: Option<Duration>,
    /// Consecutive failed calls that open the breaker.
    pub breaker_failure_threshold: u32,
    pub breaker_open_duration: Duration,
    /// Bound on each individual attempt.
    pub timeout: Duration,
    pub fallback_text: String,
}

impl Default for ResiliencePolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: 2,
            backoff_unit: Duration::from_secs(1),
            max_backoff: None,
            breaker_failure_threshold: 5,
            breaker_open_duration: Duration::from_secs(60),
            timeout: Duration::from_secs(60),
            fallback_text: DEFAULT_FALLBACK_TEXT.to_string(),
        }
    }
}

impl ResiliencePolicy {
    /// Wait before the retry that follows failed attempt `attempt` (0-indexed).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let factor = self.backoff_base.checked_pow(attempt).unwrap_or(u32::MAX);
        let delay = self.backoff_unit.saturating_mul(factor);
        match self.max_backoff {
            Some(cap) => delay.min(cap),
            None => delay,
        }
    }

    /// Total attempts a single call may make.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Check the invariants a wrapper relies on.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.backoff_base == 0 {
            return Err(DomainError::InvalidPolicy(
                "backoff_base must be at least 1".to_string(),
            ));
        }
        if self.breaker_failure_threshold == 0 {
            return Err(DomainError::InvalidPolicy(
                "breaker_failure_threshold must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(DomainError::InvalidPolicy(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    // ==================== Builder Methods ====================

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_backoff(mut self, base: u32, unit: Duration) -> Self {
        self.backoff_base = base;
        self.backoff_unit = unit;
        self
    }

    pub fn with_max_backoff(mut self, cap: Duration) -> Self {
        self.max_backoff = Some(cap);
        self
    }

    pub fn with_breaker(mut self, failure_threshold: u32, open_duration: Duration) -> Self {
        self.breaker_failure_threshold = failure_threshold;
        self.breaker_open_duration = open_duration;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_fallback_text(mut self, text: impl Into<String>) -> Self {
        self.fallback_text = text.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let policy = ResiliencePolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.backoff_base, 2);
        assert_eq!(policy.breaker_failure_threshold, 5);
        assert_eq!(policy.breaker_open_duration, Duration::from_secs(60));
        assert_eq!(policy.timeout, Duration::from_secs(60));
        assert_eq!(policy.fallback_text, DEFAULT_FALLBACK_TEXT);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_backoff_is_exponential_in_seconds() {
        let policy = ResiliencePolicy::default();
        assert_eq!(policy.backoff_delay(0), Duration::from_secs(1));
        assert_eq!(policy.backoff_delay(1), Duration::from_secs(2));
        assert_eq!(policy.backoff_delay(2), Duration::from_secs(4));
        assert_eq!(policy.backoff_delay(3), Duration::from_secs(8));
    }

    #[test]
    fn test_backoff_respects_cap() {
        let policy = ResiliencePolicy::default().with_max_backoff(Duration::from_secs(30));
        assert_eq!(policy.backoff_delay(4), Duration::from_secs(16));
        assert_eq!(policy.backoff_delay(5), Duration::from_secs(30));
    }

    #[test]
    fn test_backoff_saturates() {
        let policy = ResiliencePolicy::default();
        // Must not panic on overflow
        let _ = policy.backoff_delay(200);
    }

    #[test]
    fn test_custom_unit_and_base() {
        let policy = ResiliencePolicy::default().with_backoff(3, Duration::from_millis(10));
        assert_eq!(policy.backoff_delay(0), Duration::from_millis(10));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(90));
    }

    #[test]
    fn test_max_attempts() {
        assert_eq!(ResiliencePolicy::default().max_attempts(), 4);
        assert_eq!(ResiliencePolicy::default().with_max_retries(0).max_attempts(), 1);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(
            ResiliencePolicy::default()
                .with_backoff(0, Duration::from_secs(1))
                .validate()
                .is_err()
        );
        assert!(
            ResiliencePolicy::default()
                .with_breaker(0, Duration::from_secs(1))
                .validate()
                .is_err()
        );
        assert!(
            ResiliencePolicy::default()
                .with_timeout(Duration::ZERO)
                .validate()
                .is_err()
        );
    }
}
