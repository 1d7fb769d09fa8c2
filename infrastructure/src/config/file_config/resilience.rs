//! Resilience configuration from TOML (`[resilience]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [resilience]
//! max_retries = 3
//! backoff_base = 2
//! backoff_unit_ms = 1000
//! max_backoff_ms = 30000
//! breaker_failure_threshold = 5
//! breaker_open_secs = 60
//! timeout_secs = 60
//! fallback_text = "Service is busy, please retry."
//! ```

use agentflow_domain::{ConfigIssue, ConfigIssueCode, DEFAULT_FALLBACK_TEXT, ResiliencePolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw resilience configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileResilienceConfig {
    /// Retries after the initial attempt
    pub max_retries: u32,
    pub backoff_base: u32,
    /// Backoff unit in milliseconds (wait = unit * base^attempt)
    pub backoff_unit_ms: u64,
    /// Optional ceiling on a single backoff wait
    pub max_backoff_ms: Option<u64>,
    pub breaker_failure_threshold: u32,
    pub breaker_open_secs: u64,
    /// Per-attempt timeout
    pub timeout_secs: u64,
    pub fallback_text: String,
}

impl Default for FileResilienceConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            backoff_base: 2,
            backoff_unit_ms: 1000,
            max_backoff_ms: None,
            breaker_failure_threshold: 5,
            breaker_open_secs: 60,
            timeout_secs: 60,
            fallback_text: DEFAULT_FALLBACK_TEXT.to_string(),
        }
    }
}

impl FileResilienceConfig {
    /// Convert to the domain policy.
    ///
    /// Zero values reported as errors by validation are replaced with the
    /// defaults, so the result always passes `ResiliencePolicy::validate`.
    pub fn to_policy(&self) -> ResiliencePolicy {
        let defaults = Self::default();
        let backoff_base = if self.backoff_base == 0 {
            defaults.backoff_base
        } else {
            self.backoff_base
        };
        let threshold = if self.breaker_failure_threshold == 0 {
            defaults.breaker_failure_threshold
        } else {
            self.breaker_failure_threshold
        };
        let timeout_secs = if self.timeout_secs == 0 {
            defaults.timeout_secs
        } else {
            self.timeout_secs
        };

        let mut policy = ResiliencePolicy::default()
            .with_max_retries(self.max_retries)
            .with_backoff(backoff_base, Duration::from_millis(self.backoff_unit_ms))
            .with_breaker(threshold, Duration::from_secs(self.breaker_open_secs))
            .with_timeout(Duration::from_secs(timeout_secs))
            .with_fallback_text(self.fallback_text.clone());
        if let Some(cap) = self.max_backoff_ms {
            policy = policy.with_max_backoff(Duration::from_millis(cap));
        }
        policy
    }

    pub(crate) fn issues(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let must_be_positive = [
            ("resilience.backoff_base", u64::from(self.backoff_base)),
            (
                "resilience.breaker_failure_threshold",
                u64::from(self.breaker_failure_threshold),
            ),
            ("resilience.timeout_secs", self.timeout_secs),
        ];
        for (field, value) in must_be_positive {
            if value == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::OutOfRange {
                        field: field.to_string(),
                        value: value.to_string(),
                    },
                    format!("{}: must be at least 1", field),
                ));
            }
        }

        if self.fallback_text.trim().is_empty() {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::EmptyFallback,
                "resilience.fallback_text: empty, callers will receive an empty string on failure",
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_domain_policy() {
        assert_eq!(
            FileResilienceConfig::default().to_policy(),
            ResiliencePolicy::default()
        );
        assert!(FileResilienceConfig::default().issues().is_empty());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: FileResilienceConfig = toml::from_str(
            r#"
max_retries = 1
max_backoff_ms = 500
"#,
        )
        .unwrap();
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.backoff_base, 2);

        let policy = config.to_policy();
        assert_eq!(policy.max_backoff, Some(Duration::from_millis(500)));
        assert_eq!(policy.max_attempts(), 2);
    }

    #[test]
    fn test_zero_values_are_errors() {
        let config = FileResilienceConfig {
            backoff_base: 0,
            timeout_secs: 0,
            ..Default::default()
        };
        let issues = config.issues();
        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.is_error()));
    }

    #[test]
    fn test_zero_values_fall_back_to_defaults() {
        let config = FileResilienceConfig {
            backoff_base: 0,
            breaker_failure_threshold: 0,
            timeout_secs: 0,
            max_retries: 1,
            ..Default::default()
        };
        let policy = config.to_policy();
        assert_eq!(policy.backoff_base, 2);
        assert_eq!(policy.breaker_failure_threshold, 5);
        assert_eq!(policy.timeout, Duration::from_secs(60));
        assert_eq!(policy.max_retries, 1);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_empty_fallback_is_warning() {
        let config = FileResilienceConfig {
            fallback_text: "  ".to_string(),
            ..Default::default()
        };
        let issues = config.issues();
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
        assert_eq!(issues[0].code, ConfigIssueCode::EmptyFallback);
    }
}
