//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! Each section lives in its own module and converts into the domain or
//! application type it configures.

mod handoff;
mod logging;
mod resilience;
mod safety;
mod session;

pub use handoff::FileHandoffConfig;
pub use logging::FileLoggingConfig;
pub use resilience::FileResilienceConfig;
pub use safety::FileSafetyConfig;
pub use session::{DEFAULT_SESSION_NAMESPACE, DEFAULT_SESSION_TTL_SECS, FileSessionConfig};

use agentflow_application::EngineConfig;
use agentflow_domain::ConfigIssue;
use serde::{Deserialize, Serialize};

/// Complete configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub resilience: FileResilienceConfig,
    pub safety: FileSafetyConfig,
    pub handoff: FileHandoffConfig,
    pub session: FileSessionConfig,
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Collect every problem in the configuration.
    ///
    /// Errors mark settings that cannot be used as given; `to_engine_config`
    /// substitutes the default for each of them. Warnings flag settings that
    /// work but probably not as intended.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.resilience.issues());
        issues.extend(self.safety.issues());
        issues.extend(self.handoff.parse_options().1);
        issues
    }

    /// Whether any issue is an error.
    pub fn has_errors(&self) -> bool {
        self.validate().iter().any(|issue| issue.is_error())
    }

    /// Convert to the application-level engine configuration.
    pub fn to_engine_config(&self) -> EngineConfig {
        EngineConfig {
            resilience: self.resilience.to_policy(),
            safety: self.safety.to_settings(),
            handoff: self.handoff.parse_options().0,
        }
    }
}
