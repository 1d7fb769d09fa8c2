//! Sequential pipeline
//!
//! Feeds the input to the first agent and each output, verbatim, to the
//! next. The last agent's output is the result.

use super::{OrchestrationError, Orchestrator, validate_roster};
use crate::ports::agent::Agent;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

/// Ordered pipeline of agents
pub struct SequentialOrchestrator {
    agents: Vec<Arc<dyn Agent>>,
}

impl SequentialOrchestrator {
    pub fn new(agents: Vec<Arc<dyn Agent>>) -> Result<Self, OrchestrationError> {
        validate_roster(&agents)?;
        Ok(Self { agents })
    }

    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name()).collect()
    }
}

#[async_trait]
impl Orchestrator for SequentialOrchestrator {
    async fn run(&self, input: &str) -> Result<String, OrchestrationError> {
        info!("Starting sequential run with {} agents", self.agents.len());

        let total = self.agents.len();
        let mut current = input.to_string();
        for (step, agent) in self.agents.iter().enumerate() {
            debug!("Step {}/{}: {}", step + 1, total, agent.name());
            current = agent
                .invoke(&current)
                .await
                .map_err(|e| OrchestrationError::invocation(agent.as_ref(), e))?;
        }

        Ok(current)
    }
}
