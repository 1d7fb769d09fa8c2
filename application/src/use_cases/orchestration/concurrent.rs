//! Concurrent fan-out / fan-in
//!
//! Every agent receives the same input in its own task. The run waits for
//! all of them; any failure fails the whole run and the aggregator is not
//! called. Outputs reach the aggregator in registration order, whatever
//! the completion order.

use super::{OrchestrationError, Orchestrator, validate_roster};
use crate::ports::agent::{Agent, AgentError};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

/// Combines per-agent outputs, given in registration order.
pub type Aggregator = Arc<dyn Fn(Vec<String>) -> String + Send + Sync>;

/// Parallel fan-out over a fixed set of agents
pub struct ConcurrentOrchestrator {
    agents: Vec<Arc<dyn Agent>>,
    aggregator: Aggregator,
}

impl ConcurrentOrchestrator {
    pub fn new<F>(agents: Vec<Arc<dyn Agent>>, aggregator: F) -> Result<Self, OrchestrationError>
    where
        F: Fn(Vec<String>) -> String + Send + Sync + 'static,
    {
        validate_roster(&agents)?;
        Ok(Self {
            agents,
            aggregator: Arc::new(aggregator),
        })
    }

    /// Aggregate by joining outputs with `separator`.
    pub fn joining(
        agents: Vec<Arc<dyn Agent>>,
        separator: impl Into<String>,
    ) -> Result<Self, OrchestrationError> {
        let separator = separator.into();
        Self::new(agents, move |outputs| outputs.join(&separator))
    }

    pub fn agent_names(&self) -> Vec<&str> {
        self.agents.iter().map(|a| a.name()).collect()
    }
}

#[async_trait]
impl Orchestrator for ConcurrentOrchestrator {
    async fn run(&self, input: &str) -> Result<String, OrchestrationError> {
        info!("Starting concurrent run with {} agents", self.agents.len());

        let mut join_set = JoinSet::new();
        for (index, agent) in self.agents.iter().enumerate() {
            let agent = Arc::clone(agent);
            let input = input.to_string();
            join_set.spawn(async move {
                let result = agent.invoke(&input).await;
                (index, result)
            });
        }

        // One slot per agent, filled by registration index
        let mut slots: Vec<Option<Result<String, AgentError>>> =
            (0..self.agents.len()).map(|_| None).collect();
        let mut join_failure = None;

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((index, result)) => {
                    match &result {
                        Ok(_) => debug!("Agent {} completed", self.agents[index].name()),
                        Err(e) => warn!("Agent {} failed: {}", self.agents[index].name(), e),
                    }
                    slots[index] = Some(result);
                }
                Err(e) => {
                    warn!("Task join error: {}", e);
                    join_failure = Some(e.to_string());
                }
            }
        }

        let mut outputs = Vec::with_capacity(slots.len());
        for (agent, slot) in self.agents.iter().zip(slots) {
            match slot {
                Some(Ok(output)) => outputs.push(output),
                Some(Err(e)) => return Err(OrchestrationError::invocation(agent.as_ref(), e)),
                None => {
                    let reason = join_failure
                        .clone()
                        .unwrap_or_else(|| "task did not complete".to_string());
                    return Err(OrchestrationError::invocation(
                        agent.as_ref(),
                        AgentError::Failed(reason),
                    ));
                }
            }
        }

        Ok((self.aggregator)(outputs))
    }
}
