//! Structured configuration issues.
//!
//! Configuration sources report problems as [`ConfigIssue`]s instead of
//! failing on the first one, so callers can print every problem at once
//! and decide whether to continue with defaults.

/// Severity level of a configuration issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Fatal: the configuration cannot work at all.
    Error,
    /// Non-fatal: the configuration works but may not behave as expected.
    Warning,
}

/// Identifies a specific configuration issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigIssueCode {
    /// The handoff pattern does not compile or has no capture group.
    InvalidHandoffPattern { pattern: String },
    /// A numeric field is outside its accepted range.
    OutOfRange { field: String, value: String },
    /// The fallback text is empty.
    EmptyFallback,
    /// A blocklist entry is empty and will be ignored.
    EmptyBlocklistTerm { index: usize },
}

/// A detected issue in the configuration.
#[derive(Debug, Clone)]
pub struct ConfigIssue {
    pub severity: Severity,
    pub code: ConfigIssueCode,
    pub message: String,
}

impl ConfigIssue {
    pub fn error(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(code: ConfigIssueCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
