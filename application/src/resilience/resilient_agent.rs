//! Resilient agent wrapper
//!
//! Protects one agent's `invoke` with, in order: a circuit breaker gate, a
//! per-attempt timeout, and retry with exponential backoff. Once the
//! safeguards trip, [`ResilientAgent::run`] returns the policy's fallback
//! text instead of an error.
//!
//! Each wrapper owns its breaker. Two call sites share fate only if they
//! share the same wrapper.

use crate::ports::agent::{Agent, AgentError};
use crate::ports::observability::{
    NoObservability, ObservabilitySink, ResilienceEvent, ResilienceEventKind,
};
use agentflow_domain::{
    BreakerDecision, BreakerTransition, CircuitBreaker, CircuitState, DomainError, Permit,
    ResiliencePolicy,
};
use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a protected call produced no agent response
#[derive(Error, Debug, Clone)]
pub enum ResilienceError {
    #[error("Circuit open, retry after {retry_after:?}")]
    CircuitOpen { retry_after: Duration },

    #[error("Call failed after {attempts} attempt(s): {source}")]
    Failed {
        attempts: u32,
        #[source]
        source: AgentError,
    },
}

/// Returns a permit to the breaker if the call is dropped before it reports
/// an outcome.
struct PermitGuard<'a> {
    breaker: &'a Mutex<CircuitBreaker>,
    permit: Option<Permit>,
}

impl<'a> PermitGuard<'a> {
    fn new(breaker: &'a Mutex<CircuitBreaker>, permit: Permit) -> Self {
        Self {
            breaker,
            permit: Some(permit),
        }
    }

    fn release(mut self) -> Option<Permit> {
        self.permit.take()
    }
}

impl Drop for PermitGuard<'_> {
    fn drop(&mut self) {
        if let Some(permit) = self.permit.take() {
            lock(self.breaker).abandon(permit);
        }
    }
}

fn lock(breaker: &Mutex<CircuitBreaker>) -> MutexGuard<'_, CircuitBreaker> {
    // Breaker updates cannot leave it half-written, so a poisoned lock is still usable
    breaker.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// An agent wrapped with timeout, retry and circuit breaker policies
pub struct ResilientAgent<A: Agent> {
    inner: A,
    policy: ResiliencePolicy,
    breaker: Mutex<CircuitBreaker>,
    sink: Arc<dyn ObservabilitySink>,
}

impl<A: Agent> ResilientAgent<A> {
    /// Wrap `inner` without checking the policy.
    ///
    /// A zero breaker threshold is treated as 1. Prefer [`Self::try_new`]
    /// for policies that come from configuration.
    pub fn new(inner: A, policy: ResiliencePolicy) -> Self {
        let breaker = CircuitBreaker::new(
            policy.breaker_failure_threshold,
            policy.breaker_open_duration,
        );
        Self {
            inner,
            policy,
            breaker: Mutex::new(breaker),
            sink: Arc::new(NoObservability),
        }
    }

    /// Wrap `inner`, rejecting a policy that fails
    /// [`ResiliencePolicy::validate`].
    pub fn try_new(inner: A, policy: ResiliencePolicy) -> Result<Self, DomainError> {
        policy.validate()?;
        Ok(Self::new(inner, policy))
    }

    /// Report retries and breaker transitions to `sink`.
    pub fn with_sink(mut self, sink: Arc<dyn ObservabilitySink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn policy(&self) -> &ResiliencePolicy {
        &self.policy
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }

    /// Current breaker state.
    pub fn circuit_state(&self) -> CircuitState {
        lock(&self.breaker).state()
    }

    /// Run the protected call, degrading to the fallback text on failure.
    pub async fn run(&self, input: &str) -> String {
        match self.call(input).await {
            Ok(output) => output,
            Err(e) => {
                debug!("Agent {} returning fallback: {}", self.inner.name(), e);
                self.policy.fallback_text.clone()
            }
        }
    }

    /// Run the protected call and report why it failed, if it did.
    pub async fn call(&self, input: &str) -> Result<String, ResilienceError> {
        let (decision, transition) = lock(&self.breaker).acquire(Instant::now());
        if let Some(transition) = transition {
            self.report_transition(transition);
        }

        let permit = match decision {
            BreakerDecision::Allowed(permit) => permit,
            BreakerDecision::Rejected { retry_after } => {
                warn!(
                    "Circuit open for agent {}, rejecting call (retry after {:?})",
                    self.inner.name(),
                    retry_after
                );
                return Err(ResilienceError::CircuitOpen { retry_after });
            }
        };

        let guard = PermitGuard::new(&self.breaker, permit);
        let outcome = self.attempt_with_retries(input).await;

        if let Some(permit) = guard.release() {
            let transition = {
                let mut breaker = lock(&self.breaker);
                match &outcome {
                    Ok(_) => breaker.record_success(permit),
                    Err(_) => breaker.record_failure(permit, Instant::now()),
                }
            };
            if let Some(transition) = transition {
                self.report_transition(transition);
            }
        }

        outcome
    }

    async fn attempt_with_retries(&self, input: &str) -> Result<String, ResilienceError> {
        let name = self.inner.name();
        let max_attempts = self.policy.max_attempts();
        let mut attempt: u32 = 0;

        loop {
            let result = match tokio::time::timeout(self.policy.timeout, self.inner.invoke(input))
                .await
            {
                Ok(result) => result,
                Err(_) => Err(AgentError::Timeout(self.policy.timeout)),
            };

            let error = match result {
                Ok(output) => {
                    if attempt > 0 {
                        info!("Agent {} succeeded on attempt {}", name, attempt + 1);
                    }
                    return Ok(output);
                }
                Err(e) => e,
            };

            let attempts = attempt + 1;
            if !error.is_transient() {
                warn!("Agent {} failed permanently: {}", name, error);
                return Err(ResilienceError::Failed {
                    attempts,
                    source: error,
                });
            }
            if attempts >= max_attempts {
                warn!(
                    "Agent {} failed after {} attempt(s): {}",
                    name, attempts, error
                );
                return Err(ResilienceError::Failed {
                    attempts,
                    source: error,
                });
            }

            let delay = self.policy.backoff_delay(attempt);
            warn!(
                "Agent {} attempt {} failed: {}. Retrying in {:?}",
                name, attempts, error, delay
            );
            self.sink.record(ResilienceEvent::new(
                ResilienceEventKind::Retry,
                name,
                json!({
                    "attempt": attempts,
                    "delay_ms": u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "error": error.to_string(),
                }),
            ));

            tokio::time::sleep(delay).await;
            attempt = attempts;
        }
    }

    fn report_transition(&self, transition: BreakerTransition) {
        let name = self.inner.name();
        let kind = match transition.to {
            CircuitState::Open => {
                warn!(
                    "Circuit breaker for agent {} opened ({} -> {})",
                    name, transition.from, transition.to
                );
                ResilienceEventKind::BreakerOpen
            }
            CircuitState::HalfOpen => {
                info!("Circuit breaker for agent {} half-open, admitting trial call", name);
                ResilienceEventKind::BreakerHalfOpen
            }
            CircuitState::Closed => {
                info!("Circuit breaker for agent {} closed", name);
                ResilienceEventKind::BreakerClose
            }
        };

        let mut attributes = json!({
            "from": transition.from.as_str(),
            "to": transition.to.as_str(),
        });
        if kind == ResilienceEventKind::BreakerOpen {
            attributes["open_secs"] = json!(self.policy.breaker_open_duration.as_secs_f64());
        }
        self.sink.record(ResilienceEvent::new(kind, name, attributes));
    }
}

#[async_trait]
impl<A: Agent> Agent for ResilientAgent<A> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    /// Never fails: safeguard trips resolve to the fallback text.
    async fn invoke(&self, input: &str) -> Result<String, AgentError> {
        Ok(self.run(input).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::completion_service::CompletionError;
    use crate::testing::{RecordingSink, ScriptedAgent};
    use agentflow_domain::DEFAULT_FALLBACK_TEXT;

    const FAST: Duration = Duration::from_millis(1);

    fn fast_policy() -> ResiliencePolicy {
        ResiliencePolicy::default()
            .with_backoff(2, FAST)
            .with_timeout(Duration::from_secs(5))
    }

    fn transient() -> AgentError {
        AgentError::Failed("temporary".to_string())
    }

    #[test]
    fn test_try_new_rejects_invalid_policy() {
        let result = ResilientAgent::try_new(
            ScriptedAgent::replying("a", "ok"),
            fast_policy().with_breaker(0, Duration::from_secs(1)),
        );
        assert!(matches!(result, Err(DomainError::InvalidPolicy(_))));

        let result = ResilientAgent::try_new(
            ScriptedAgent::replying("a", "ok"),
            fast_policy().with_timeout(Duration::ZERO),
        );
        assert!(matches!(result, Err(DomainError::InvalidPolicy(_))));

        assert!(ResilientAgent::try_new(ScriptedAgent::replying("a", "ok"), fast_policy()).is_ok());
    }

    // ==================== Retry ====================

    #[tokio::test]
    async fn test_success_passes_through() {
        let agent = ResilientAgent::new(ScriptedAgent::replying("a", "ok"), fast_policy());
        assert_eq!(agent.run("hi").await, "ok");
        assert_eq!(agent.inner().calls(), 1);
        assert_eq!(agent.circuit_state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_transient_failures_are_retried() {
        let sink = Arc::new(RecordingSink::default());
        let inner = ScriptedAgent::new("a")
            .then_err(transient())
            .then_err(transient())
            .then_ok("recovered");
        let agent = ResilientAgent::new(inner, fast_policy()).with_sink(sink.clone());

        assert_eq!(agent.run("hi").await, "recovered");
        assert_eq!(agent.inner().calls(), 3);

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind == ResilienceEventKind::Retry));
        assert_eq!(events[0].attributes["attempt"], 1);
        assert_eq!(events[1].attributes["attempt"], 2);
        assert_eq!(events[1].attributes["delay_ms"], 2);
        assert_eq!(events[0].agent, "a");
    }

    #[tokio::test]
    async fn test_exhausted_retries_return_fallback() {
        let inner = ScriptedAgent::new("a")
            .then_err(transient())
            .then_err(transient())
            .then_err(transient())
            .then_err(transient());
        let agent = ResilientAgent::new(inner, fast_policy());

        assert_eq!(agent.run("hi").await, DEFAULT_FALLBACK_TEXT);
        assert_eq!(agent.inner().calls(), 4);
    }

    #[tokio::test]
    async fn test_call_reports_attempt_count() {
        let inner = ScriptedAgent::new("a")
            .then_err(transient())
            .then_err(transient());
        let agent = ResilientAgent::new(inner, fast_policy().with_max_retries(1));

        match agent.call("hi").await {
            Err(ResilienceError::Failed { attempts, .. }) => assert_eq!(attempts, 2),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_permanent_failure_is_not_retried() {
        let inner = ScriptedAgent::new("a").then_err(AgentError::Completion(
            CompletionError::Authentication("bad key".to_string()),
        ));
        let agent = ResilientAgent::new(inner, fast_policy());

        assert_eq!(agent.run("hi").await, DEFAULT_FALLBACK_TEXT);
        assert_eq!(agent.inner().calls(), 1);
    }

    #[tokio::test]
    async fn test_backoff_waits_grow_exponentially() {
        let unit = Duration::from_millis(10);
        let inner = ScriptedAgent::new("a")
            .then_err(transient())
            .then_err(transient())
            .then_ok("ok");
        let agent = ResilientAgent::new(inner, fast_policy().with_backoff(2, unit));

        let started = Instant::now();
        assert_eq!(agent.run("hi").await, "ok");
        // 10ms before the first retry, 20ms before the second
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn test_custom_fallback_text() {
        let inner = ScriptedAgent::new("a").then_err(AgentError::Rejected("no".to_string()));
        let agent = ResilientAgent::new(inner, fast_policy().with_fallback_text("try later"));
        assert_eq!(agent.run("hi").await, "try later");
    }

    // ==================== Timeout ====================

    #[tokio::test]
    async fn test_slow_attempt_times_out() {
        let inner = ScriptedAgent::new("a").then_delayed(Duration::from_secs(5), "too late");
        let policy = fast_policy()
            .with_max_retries(0)
            .with_timeout(Duration::from_millis(20));
        let agent = ResilientAgent::new(inner, policy);

        let started = Instant::now();
        match agent.call("hi").await {
            Err(ResilienceError::Failed { source, .. }) => {
                assert!(matches!(source, AgentError::Timeout(_)))
            }
            other => panic!("expected timeout, got {:?}", other),
        }
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_timed_out_attempt_is_retried() {
        let inner = ScriptedAgent::new("a")
            .then_delayed(Duration::from_secs(5), "too late")
            .then_ok("fast");
        let policy = fast_policy().with_timeout(Duration::from_millis(20));
        let agent = ResilientAgent::new(inner, policy);

        assert_eq!(agent.run("hi").await, "fast");
        assert_eq!(agent.inner().calls(), 2);
    }

    // ==================== Circuit Breaker ====================

    fn breaker_policy(open: Duration) -> ResiliencePolicy {
        fast_policy().with_max_retries(0).with_breaker(2, open)
    }

    #[tokio::test]
    async fn test_breaker_opens_and_rejects_without_attempt() {
        let sink = Arc::new(RecordingSink::default());
        let inner = ScriptedAgent::new("a")
            .then_err(transient())
            .then_err(transient());
        let agent = ResilientAgent::new(inner, breaker_policy(Duration::from_secs(60)))
            .with_sink(sink.clone());

        agent.run("1").await;
        assert_eq!(agent.circuit_state(), CircuitState::Closed);
        agent.run("2").await;
        assert_eq!(agent.circuit_state(), CircuitState::Open);
        assert_eq!(sink.kinds(), vec![ResilienceEventKind::BreakerOpen]);

        assert!(matches!(
            agent.call("3").await,
            Err(ResilienceError::CircuitOpen { .. })
        ));
        assert_eq!(agent.run("4").await, DEFAULT_FALLBACK_TEXT);
        assert_eq!(agent.inner().calls(), 2);
    }

    #[tokio::test]
    async fn test_half_open_trial_success_closes() {
        let sink = Arc::new(RecordingSink::default());
        let inner = ScriptedAgent::new("a")
            .then_err(transient())
            .then_err(transient())
            .then_ok("back");
        let agent = ResilientAgent::new(inner, breaker_policy(Duration::from_millis(30)))
            .with_sink(sink.clone());

        agent.run("1").await;
        agent.run("2").await;
        assert_eq!(agent.circuit_state(), CircuitState::Open);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(agent.run("3").await, "back");
        assert_eq!(agent.circuit_state(), CircuitState::Closed);
        assert_eq!(
            sink.kinds(),
            vec![
                ResilienceEventKind::BreakerOpen,
                ResilienceEventKind::BreakerHalfOpen,
                ResilienceEventKind::BreakerClose,
            ]
        );
    }

    #[tokio::test]
    async fn test_half_open_trial_failure_reopens() {
        let inner = ScriptedAgent::new("a")
            .then_err(transient())
            .then_err(transient())
            .then_err(transient());
        let agent = ResilientAgent::new(inner, breaker_policy(Duration::from_millis(30)));

        agent.run("1").await;
        agent.run("2").await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        assert_eq!(agent.run("3").await, DEFAULT_FALLBACK_TEXT);
        assert_eq!(agent.circuit_state(), CircuitState::Open);
        assert_eq!(agent.inner().calls(), 3);

        // Timer restarted by the failed trial
        agent.run("4").await;
        assert_eq!(agent.inner().calls(), 3);
    }

    #[tokio::test]
    async fn test_concurrent_calls_during_trial_are_rejected() {
        let inner = ScriptedAgent::new("a")
            .then_err(transient())
            .then_err(transient())
            .then_delayed(Duration::from_millis(100), "trial ok");
        let agent = Arc::new(ResilientAgent::new(
            inner,
            breaker_policy(Duration::from_millis(30)),
        ));

        agent.run("1").await;
        agent.run("2").await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        let trial = {
            let agent = Arc::clone(&agent);
            tokio::spawn(async move { agent.run("trial").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(agent.circuit_state(), CircuitState::HalfOpen);
        assert_eq!(agent.run("other").await, DEFAULT_FALLBACK_TEXT);

        assert_eq!(trial.await.unwrap(), "trial ok");
        assert_eq!(agent.circuit_state(), CircuitState::Closed);
        assert_eq!(agent.inner().calls(), 3);
    }

    #[tokio::test]
    async fn test_cancelled_trial_frees_slot() {
        let inner = ScriptedAgent::new("a")
            .then_err(transient())
            .then_err(transient())
            .then_delayed(Duration::from_secs(5), "never")
            .then_ok("second trial");
        let agent = ResilientAgent::new(inner, breaker_policy(Duration::from_millis(30)));

        agent.run("1").await;
        agent.run("2").await;
        tokio::time::sleep(Duration::from_millis(50)).await;

        let cancelled = tokio::time::timeout(Duration::from_millis(20), agent.run("trial")).await;
        assert!(cancelled.is_err());
        assert_eq!(agent.circuit_state(), CircuitState::HalfOpen);

        assert_eq!(agent.run("again").await, "second trial");
        assert_eq!(agent.circuit_state(), CircuitState::Closed);
    }

    #[tokio::test]
    async fn test_agent_impl_never_fails() {
        let inner = ScriptedAgent::new("wrapped").then_err(AgentError::Rejected("x".to_string()));
        let agent = ResilientAgent::new(inner, fast_policy());

        assert_eq!(Agent::name(&agent), "wrapped");
        assert_eq!(agent.invoke("hi").await.unwrap(), DEFAULT_FALLBACK_TEXT);
    }
}
