//! Sink that forwards every event to several sinks.

use agentflow_application::{ObservabilitySink, ResilienceEvent};
use std::sync::Arc;

/// Forwards each event to all registered sinks, in registration order.
#[derive(Default)]
pub struct FanoutEventSink {
    sinks: Vec<Arc<dyn ObservabilitySink>>,
}

impl FanoutEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: Arc<dyn ObservabilitySink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl ObservabilitySink for FanoutEventSink {
    fn record(&self, event: ResilienceEvent) {
        if let Some((last, rest)) = self.sinks.split_last() {
            for sink in rest {
                sink.record(event.clone());
            }
            last.record(event);
        }
    }
}
