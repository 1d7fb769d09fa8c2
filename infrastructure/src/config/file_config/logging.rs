//! Logging configuration from TOML (`[logging]` section)
//!
//! ```toml
//! [logging]
//! events_file = "/var/lib/agentflow/events.jsonl"
//! directory = "/var/log/agentflow"
//! ```
//!
//! `events_file` is consumed by [`FileLoggingConfig::event_sink`], which
//! applications embedding the engine pass to `EngineConfig::protect`. The
//! `agentflow` binary runs no agents and only reads `directory`.

use crate::logging::{FanoutEventSink, JsonlEventSink, TracingEventSink};
use agentflow_application::ObservabilitySink;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Raw logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving resilience events (paths are used as given,
    /// `~` is not expanded)
    pub events_file: Option<PathBuf>,
    /// Directory for daily rolling diagnostic logs
    pub directory: Option<PathBuf>,
}

impl FileLoggingConfig {
    /// Build the resilience event sink for this configuration.
    ///
    /// Events always go to `tracing`; with `events_file` set they are also
    /// appended as JSONL. An unopenable file is skipped with a warning.
    pub fn event_sink(&self) -> FanoutEventSink {
        let sink = FanoutEventSink::new().with(Arc::new(TracingEventSink));
        match self.events_file.as_deref().and_then(JsonlEventSink::new) {
            Some(jsonl) => sink.with(Arc::new(jsonl) as Arc<dyn ObservabilitySink>),
            None => sink,
        }
    }
}
