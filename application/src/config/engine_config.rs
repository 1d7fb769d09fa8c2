//! Engine configuration shared by orchestrations built from one config.

use crate::ports::agent::Agent;
use crate::ports::observability::ObservabilitySink;
use crate::resilience::ResilientAgent;
use crate::use_cases::orchestration::{GuardedOrchestrator, HandoffOptions, Orchestrator};
use agentflow_domain::{ContentSafetyGate, DomainError, ResiliencePolicy, SafetySettings};
use std::sync::Arc;

/// Settings for the three cooperating pieces of the engine
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
    pub resilience: ResiliencePolicy,
    pub safety: SafetySettings,
    pub handoff: HandoffOptions,
}

impl EngineConfig {
    /// A safety gate built from the safety settings.
    pub fn safety_gate(&self) -> ContentSafetyGate {
        ContentSafetyGate::new(self.safety.clone())
    }

    /// Wrap `agent` in its own resilience wrapper.
    ///
    /// Every call creates a fresh circuit breaker; wrap each protected call
    /// site once and reuse the result. Fails if the resilience policy is
    /// invalid.
    pub fn protect<A: Agent>(
        &self,
        agent: A,
        sink: Arc<dyn ObservabilitySink>,
    ) -> Result<ResilientAgent<A>, DomainError> {
        Ok(ResilientAgent::try_new(agent, self.resilience.clone())?.with_sink(sink))
    }

    /// Gate `orchestrator` with the configured safety settings.
    pub fn guard<O: Orchestrator>(&self, orchestrator: O) -> GuardedOrchestrator<O> {
        GuardedOrchestrator::new(orchestrator, self.safety_gate())
    }
}
