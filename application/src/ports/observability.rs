//! Port for resilience observability events.
//!
//! Retries and circuit breaker transitions are reported as structured
//! [`ResilienceEvent`]s. This is separate from `tracing` diagnostics: sinks
//! receive machine-readable records (e.g. JSONL) for an external collector.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of resilience event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResilienceEventKind {
    Retry,
    BreakerOpen,
    BreakerClose,
    BreakerHalfOpen,
}

impl ResilienceEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Retry => "retry",
            Self::BreakerOpen => "breaker_open",
            Self::BreakerClose => "breaker_close",
            Self::BreakerHalfOpen => "breaker_half_open",
        }
    }
}

/// A structured resilience event.
#[derive(Debug, Clone, PartialEq)]
pub struct ResilienceEvent {
    pub kind: ResilienceEventKind,
    /// Name of the protected agent.
    pub agent: String,
    /// JSON object with event-specific fields.
    pub attributes: Value,
}

impl ResilienceEvent {
    pub fn new(kind: ResilienceEventKind, agent: impl Into<String>, attributes: Value) -> Self {
        Self {
            kind,
            agent: agent.into(),
            attributes,
        }
    }
}

/// Receiver of resilience events.
///
/// `record` is synchronous and infallible so it can never block or alter
/// the protected call; sinks swallow their own failures.
pub trait ObservabilitySink: Send + Sync {
    fn record(&self, event: ResilienceEvent);
}

/// No-op sink for tests and when event export is disabled.
pub struct NoObservability;

impl ObservabilitySink for NoObservability {
    fn record(&self, _event: ResilienceEvent) {}
}
