//! Orchestration use cases
//!
//! Three control-flow shapes over a set of agents:
//!
//! - [`SequentialOrchestrator`]: each agent receives the previous output
//! - [`ConcurrentOrchestrator`]: all agents receive the same input in
//!   parallel; outputs are aggregated in registration order
//! - [`HandoffOrchestrator`]: agents transfer the task by emitting a marker
//!   matched by a [`HandoffRule`](agentflow_domain::HandoffRule)
//!
//! [`GuardedOrchestrator`] wraps any of them with the content safety gate.

pub mod concurrent;
pub mod guarded;
pub mod handoff;
pub mod sequential;

pub use concurrent::{Aggregator, ConcurrentOrchestrator};
pub use guarded::GuardedOrchestrator;
pub use handoff::{DEFAULT_MAX_HOPS, HandoffOptions, HandoffOrchestrator};
pub use sequential::SequentialOrchestrator;

use crate::ports::agent::{Agent, AgentError};
use agentflow_domain::{DomainError, SafetyResult};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while running an orchestration
#[derive(Error, Debug)]
pub enum OrchestrationError {
    #[error("Agent '{agent}' failed: {source}")]
    AgentInvocation {
        agent: String,
        #[source]
        source: AgentError,
    },

    #[error("No agents configured")]
    NoAgents,

    #[error("Duplicate agent name: {0}")]
    DuplicateAgent(String),

    #[error(transparent)]
    Invalid(#[from] DomainError),

    #[error("Unsafe input rejected: {0}")]
    UnsafeInput(SafetyResult),
}

impl OrchestrationError {
    pub(crate) fn invocation(agent: &dyn Agent, source: AgentError) -> Self {
        OrchestrationError::AgentInvocation {
            agent: agent.name().to_string(),
            source,
        }
    }

    /// Name of the failed agent, for invocation errors.
    pub fn failed_agent(&self) -> Option<&str> {
        match self {
            OrchestrationError::AgentInvocation { agent, .. } => Some(agent),
            _ => None,
        }
    }
}

/// A runnable composition of agents
#[async_trait]
pub trait Orchestrator: Send + Sync {
    /// Run the composition on `input` and return the final text.
    async fn run(&self, input: &str) -> Result<String, OrchestrationError>;
}

/// Check a roster is non-empty and its names are non-empty and unique.
pub(crate) fn validate_roster(agents: &[Arc<dyn Agent>]) -> Result<(), OrchestrationError> {
    if agents.is_empty() {
        return Err(OrchestrationError::NoAgents);
    }
    let mut seen = HashSet::new();
    for agent in agents {
        let name = agent.name();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidAgentName(name.to_string()).into());
        }
        if !seen.insert(name) {
            return Err(OrchestrationError::DuplicateAgent(name.to_string()));
        }
    }
    Ok(())
}
