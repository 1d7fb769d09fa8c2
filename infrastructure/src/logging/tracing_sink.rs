//! Event sink that forwards resilience events to `tracing`.

use agentflow_application::{ObservabilitySink, ResilienceEvent, ResilienceEventKind};
use tracing::{info, warn};

/// Emits each event as a structured tracing record under the
/// `agentflow::events` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl ObservabilitySink for TracingEventSink {
    fn record(&self, event: ResilienceEvent) {
        match event.kind {
            ResilienceEventKind::BreakerOpen => warn!(
                target: "agentflow::events",
                kind = event.kind.as_str(),
                agent = %event.agent,
                attributes = %event.attributes,
                "resilience event"
            ),
            _ => info!(
                target: "agentflow::events",
                kind = event.kind.as_str(),
                agent = %event.agent,
                attributes = %event.attributes,
                "resilience event"
            ),
        }
    }
}
