//! Configuration file loading for agentflow
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables `AGENTFLOW_<SECTION>__<KEY>`
//! 2. `--config <path>` specified file
//! 3. Project root: `./agentflow.toml` or `./.agentflow.toml`
//! 4. Global: `$XDG_CONFIG_HOME/agentflow/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    DEFAULT_SESSION_NAMESPACE, DEFAULT_SESSION_TTL_SECS, FileConfig, FileHandoffConfig,
    FileLoggingConfig, FileResilienceConfig, FileSafetyConfig, FileSessionConfig,
};
pub use loader::ConfigLoader;
