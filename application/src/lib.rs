//! Application layer for agentflow
//!
//! This crate contains the orchestration use cases, the resilient agent
//! wrapper, port definitions and application configuration.
//! It depends only on the domain layer.

pub mod agents;
pub mod config;
pub mod ports;
pub mod resilience;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use agents::completion_agent::CompletionAgent;
pub use config::EngineConfig;
pub use ports::{
    agent::{Agent, AgentError},
    completion_service::{CompletionError, CompletionService},
    observability::{NoObservability, ObservabilitySink, ResilienceEvent, ResilienceEventKind},
    session_store::{SessionStore, SessionStoreError},
};
pub use resilience::{ResilienceError, ResilientAgent};
pub use use_cases::orchestration::{
    Aggregator, ConcurrentOrchestrator, DEFAULT_MAX_HOPS, GuardedOrchestrator, HandoffOptions,
    HandoffOrchestrator, OrchestrationError, Orchestrator, SequentialOrchestrator,
};
