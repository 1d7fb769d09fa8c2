//! Handoff chain
//!
//! The initial agent answers first. When its response matches the handoff
//! rule and the captured name is in the routing table, that agent takes
//! over and is invoked again; otherwise the last response is returned as-is.
//! An unknown target is a normal stop, not an error.

use super::{OrchestrationError, Orchestrator, validate_roster};
use crate::ports::agent::Agent;
use agentflow_domain::{DomainError, HandoffOutcome, HandoffRule, HandoffTermination};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Default bound on handoffs per run.
pub const DEFAULT_MAX_HOPS: usize = 10;

/// Handoff behaviour settings
#[derive(Debug, Clone)]
pub struct HandoffOptions {
    pub rule: HandoffRule,
    /// Handoffs allowed before the chain is cut off.
    pub max_hops: usize,
    /// Pass the previous response to the next agent instead of the
    /// original input.
    pub carry_forward_output: bool,
}

impl Default for HandoffOptions {
    fn default() -> Self {
        Self {
            rule: HandoffRule::default(),
            max_hops: DEFAULT_MAX_HOPS,
            carry_forward_output: false,
        }
    }
}

impl HandoffOptions {
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self, DomainError> {
        self.rule = HandoffRule::new(pattern)?;
        Ok(self)
    }

    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    pub fn with_carry_forward_output(mut self, enabled: bool) -> Self {
        self.carry_forward_output = enabled;
        self
    }
}

/// Dynamic routing between agents driven by handoff markers
pub struct HandoffOrchestrator {
    initial: Arc<dyn Agent>,
    table: HashMap<String, Arc<dyn Agent>>,
    options: HandoffOptions,
}

impl HandoffOrchestrator {
    /// Build with `initial` as the entry point and `targets` as the routing
    /// table, keyed by each agent's name.
    ///
    /// The initial agent may also appear in the table, but no other agent
    /// may share its name.
    pub fn new(
        initial: Arc<dyn Agent>,
        targets: Vec<Arc<dyn Agent>>,
    ) -> Result<Self, OrchestrationError> {
        validate_roster(std::slice::from_ref(&initial))?;
        let table: HashMap<String, Arc<dyn Agent>> = if targets.is_empty() {
            HashMap::new()
        } else {
            validate_roster(&targets)?;
            targets
                .into_iter()
                .map(|agent| (agent.name().to_string(), agent))
                .collect()
        };

        if let Some(entry) = table.get(initial.name())
            && !std::ptr::addr_eq(Arc::as_ptr(entry), Arc::as_ptr(&initial))
        {
            return Err(OrchestrationError::DuplicateAgent(initial.name().to_string()));
        }

        Ok(Self {
            initial,
            table,
            options: HandoffOptions::default(),
        })
    }

    pub fn with_options(mut self, options: HandoffOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &HandoffOptions {
        &self.options
    }

    /// Names in the routing table, sorted.
    pub fn target_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.table.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the chain and report where and why it stopped.
    pub async fn run_detailed(&self, input: &str) -> Result<HandoffOutcome, OrchestrationError> {
        let mut current = Arc::clone(&self.initial);
        info!("Starting handoff run at agent {}", current.name());

        let mut response = current
            .invoke(input)
            .await
            .map_err(|e| OrchestrationError::invocation(current.as_ref(), e))?;
        let mut hops = 0;

        let termination = loop {
            let Some(target) = self.options.rule.target(&response) else {
                break HandoffTermination::NoMatch;
            };
            let Some(next) = self.table.get(target) else {
                debug!(
                    "Agent {} requested unknown target {}, stopping",
                    current.name(),
                    target
                );
                break HandoffTermination::UnknownTarget(target.to_string());
            };
            if hops >= self.options.max_hops {
                warn!(
                    "Handoff limit of {} reached at agent {}, returning last response",
                    self.options.max_hops,
                    current.name()
                );
                break HandoffTermination::HopLimit;
            }

            hops += 1;
            info!("Handoff {}: {} -> {}", hops, current.name(), next.name());

            let next_input = if self.options.carry_forward_output {
                response.clone()
            } else {
                input.to_string()
            };
            current = Arc::clone(next);
            response = current
                .invoke(&next_input)
                .await
                .map_err(|e| OrchestrationError::invocation(current.as_ref(), e))?;
        };

        Ok(HandoffOutcome {
            response,
            final_agent: current.name().to_string(),
            hops,
            termination,
        })
    }
}

#[async_trait]
impl Orchestrator for HandoffOrchestrator {
    async fn run(&self, input: &str) -> Result<String, OrchestrationError> {
        Ok(self.run_detailed(input).await?.response)
    }
}
