//! Safety-gated orchestration
//!
//! Runs the content safety gate on the caller's input before the inner
//! orchestrator sees it, and redacts PII from the result before it leaves.

use super::{OrchestrationError, Orchestrator};
use agentflow_domain::ContentSafetyGate;
use async_trait::async_trait;
use tracing::{info, warn};

/// Orchestrator wrapped with input checks and output sanitisation
pub struct GuardedOrchestrator<O: Orchestrator> {
    inner: O,
    gate: ContentSafetyGate,
}

impl<O: Orchestrator> GuardedOrchestrator<O> {
    pub fn new(inner: O, gate: ContentSafetyGate) -> Self {
        Self { inner, gate }
    }

    pub fn inner(&self) -> &O {
        &self.inner
    }

    pub fn gate(&self) -> &ContentSafetyGate {
        &self.gate
    }
}

#[async_trait]
impl<O: Orchestrator> Orchestrator for GuardedOrchestrator<O> {
    async fn run(&self, input: &str) -> Result<String, OrchestrationError> {
        let verdict = self.gate.check_input(input);
        if !verdict.is_safe() {
            warn!("Rejected unsafe input: {}", verdict.details());
            return Err(OrchestrationError::UnsafeInput(verdict));
        }

        let output = self.inner.run(input).await?;
        let sanitized = self.gate.sanitize_output(&output);
        if sanitized != output {
            info!("Redacted PII from orchestration output");
        }
        Ok(sanitized)
    }
}
