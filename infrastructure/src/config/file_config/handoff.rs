//! Handoff configuration from TOML (`[handoff]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [handoff]
//! pattern = 'ROUTE->(\w+)'
//! max_hops = 5
//! carry_forward_output = false
//! ```

use agentflow_application::{DEFAULT_MAX_HOPS, HandoffOptions};
use agentflow_domain::{
    ConfigIssue, ConfigIssueCode, DEFAULT_HANDOFF_PATTERN, HandoffRule,
};
use serde::{Deserialize, Serialize};

/// Raw handoff configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHandoffConfig {
    /// Regex whose first capture group names the next agent
    pub pattern: String,
    pub max_hops: usize,
    /// Pass the previous response instead of the original input
    pub carry_forward_output: bool,
}

impl Default for FileHandoffConfig {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_HANDOFF_PATTERN.to_string(),
            max_hops: DEFAULT_MAX_HOPS,
            carry_forward_output: false,
        }
    }
}

impl FileHandoffConfig {
    /// Convert to handoff options, falling back to the default pattern
    /// or hop limit when the configured one is invalid.
    pub fn parse_options(&self) -> (HandoffOptions, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        let rule = match HandoffRule::new(&self.pattern) {
            Ok(rule) => rule,
            Err(e) => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::InvalidHandoffPattern {
                        pattern: self.pattern.clone(),
                    },
                    format!("handoff.pattern: {}", e),
                ));
                HandoffRule::default()
            }
        };

        let max_hops = if self.max_hops == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::OutOfRange {
                    field: "handoff.max_hops".to_string(),
                    value: "0".to_string(),
                },
                "handoff.max_hops: must be at least 1",
            ));
            DEFAULT_MAX_HOPS
        } else {
            self.max_hops
        };

        let options = HandoffOptions {
            rule,
            max_hops,
            carry_forward_output: self.carry_forward_output,
        };
        (options, issues)
    }
}
