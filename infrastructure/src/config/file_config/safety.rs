//! Content safety configuration from TOML (`[safety]` section)
//!
//! Example configuration:
//!
//! ```toml
//! [safety]
//! max_input_length = 4000
//! block_pii = true
//! block_jailbreaks = true
//! blocklist = ["internal codename", "competitor"]
//! ```

use agentflow_domain::{ConfigIssue, ConfigIssueCode, DEFAULT_MAX_INPUT_LENGTH, SafetySettings};
use serde::{Deserialize, Serialize};

/// Raw safety configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSafetyConfig {
    /// Maximum input length in characters
    pub max_input_length: usize,
    pub block_pii: bool,
    pub block_jailbreaks: bool,
    /// Case-insensitive terms rejected in inputs
    pub blocklist: Vec<String>,
}

impl Default for FileSafetyConfig {
    fn default() -> Self {
        Self {
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            block_pii: true,
            block_jailbreaks: true,
            blocklist: Vec::new(),
        }
    }
}

impl FileSafetyConfig {
    pub fn to_settings(&self) -> SafetySettings {
        SafetySettings {
            max_input_length: self.max_input_length,
            block_pii: self.block_pii,
            block_jailbreaks: self.block_jailbreaks,
            blocklist: self.blocklist.clone(),
        }
    }

    pub(crate) fn issues(&self) -> Vec<ConfigIssue> {
        self.blocklist
            .iter()
            .enumerate()
            .filter(|(_, term)| term.trim().is_empty())
            .map(|(index, _)| {
                ConfigIssue::warning(
                    ConfigIssueCode::EmptyBlocklistTerm { index },
                    format!("safety.blocklist[{}]: empty term is ignored", index),
                )
            })
            .collect()
    }
}
