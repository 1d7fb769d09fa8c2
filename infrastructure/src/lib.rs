//! Infrastructure layer for agentflow
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod logging;
pub mod session;

// Re-export commonly used types
pub use config::{
    ConfigLoader, FileConfig, FileHandoffConfig, FileLoggingConfig, FileResilienceConfig,
    FileSafetyConfig, FileSessionConfig,
};
pub use logging::{FanoutEventSink, JsonlEventSink, TracingEventSink};
pub use session::{InMemorySessionStore, JsonFileSessionStore};
