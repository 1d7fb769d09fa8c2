//! Logging infrastructure: resilience event sinks.
//!
//! Implementations of the
//! [`ObservabilitySink`](agentflow_application::ObservabilitySink) port:
//!
//! - [`JsonlEventSink`]: one JSON object per line in a file
//! - [`TracingEventSink`]: structured `tracing` records
//! - [`FanoutEventSink`]: forwards to several sinks

mod fanout;
mod jsonl_sink;
mod tracing_sink;

pub use fanout::FanoutEventSink;
pub use jsonl_sink::JsonlEventSink;
pub use tracing_sink::TracingEventSink;
