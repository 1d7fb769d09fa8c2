//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid agent name: {0}")]
    InvalidAgentName(String),

    #[error("Invalid handoff pattern '{pattern}': {reason}")]
    InvalidHandoffPattern { pattern: String, reason: String },

    #[error("Invalid resilience policy: {0}")]
    InvalidPolicy(String),
}

impl DomainError {
    /// Check if this error comes from a malformed handoff pattern
    pub fn is_pattern_error(&self) -> bool {
        matches!(self, DomainError::InvalidHandoffPattern { .. })
    }
}
