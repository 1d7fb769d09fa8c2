//! Handoff rule: detects a transfer request in an agent's output.
//!
//! A handoff is signalled purely by text. The rule's regular expression is
//! matched against the response and its first capture group names the next
//! agent. No interpretation beyond the pattern match takes place.

use crate::core::error::DomainError;
use regex::Regex;
use std::sync::OnceLock;

/// Pattern used when none is configured: `HANDOFF:<AgentName>`.
pub const DEFAULT_HANDOFF_PATTERN: &str = r"HANDOFF:(\w+)";

/// A compiled handoff pattern with at least one capture group.
#[derive(Debug, Clone)]
pub struct HandoffRule {
    pattern: Regex,
}

impl HandoffRule {
    /// Compile a handoff pattern.
    ///
    /// The pattern must contain a capture group; group 1 is read as the
    /// target agent name.
    pub fn new(pattern: &str) -> Result<Self, DomainError> {
        let regex = Regex::new(pattern).map_err(|e| DomainError::InvalidHandoffPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        // captures_len() counts the implicit whole-match group
        if regex.captures_len() < 2 {
            return Err(DomainError::InvalidHandoffPattern {
                pattern: pattern.to_string(),
                reason: "pattern needs a capture group naming the target agent".to_string(),
            });
        }

        Ok(Self { pattern: regex })
    }

    /// The source text of the pattern.
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }

    /// Extract the requested target agent name from `text`, if any.
    ///
    /// Returns `None` when the pattern does not match, or when it matches
    /// without the first group participating.
    pub fn target<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

impl Default for HandoffRule {
    fn default() -> Self {
        static DEFAULT: OnceLock<Regex> = OnceLock::new();
        let pattern = DEFAULT
            .get_or_init(|| Regex::new(DEFAULT_HANDOFF_PATTERN).expect("default pattern is valid"))
            .clone();
        Self { pattern }
    }
}
