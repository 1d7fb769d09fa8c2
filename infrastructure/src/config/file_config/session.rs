//! Session store configuration from TOML (`[session]` section)
//!
//! ```toml
//! [session]
//! directory = "/var/lib/agentflow/sessions"
//! namespace = "agent:thread"
//! ttl_secs = 604800
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default key namespace for persisted sessions
pub const DEFAULT_SESSION_NAMESPACE: &str = "agent:thread";

/// Default session expiry: seven days
pub const DEFAULT_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Raw session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSessionConfig {
    /// Directory for session files (platform data dir if unset)
    pub directory: Option<PathBuf>,
    pub namespace: String,
    pub ttl_secs: u64,
}

impl Default for FileSessionConfig {
    fn default() -> Self {
        Self {
            directory: None,
            namespace: DEFAULT_SESSION_NAMESPACE.to_string(),
            ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

impl FileSessionConfig {
    /// Configured directory, or `<data_dir>/agentflow/sessions`.
    pub fn resolved_directory(&self) -> Option<PathBuf> {
        self.directory
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join("agentflow").join("sessions")))
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = FileSessionConfig::default();
        assert_eq!(config.namespace, "agent:thread");
        assert_eq!(config.ttl(), Duration::from_secs(604_800));
    }

    #[test]
    fn test_explicit_directory_wins() {
        let config: FileSessionConfig = toml::from_str(r#"directory = "/tmp/sessions""#).unwrap();
        assert_eq!(
            config.resolved_directory(),
            Some(PathBuf::from("/tmp/sessions"))
        );
    }
}
