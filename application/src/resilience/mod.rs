//! Resilience wrapper for agent calls

pub mod resilient_agent;

pub use resilient_agent::{ResilienceError, ResilientAgent};
