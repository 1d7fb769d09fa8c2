//! Circuit breaker state machine.
//!
//! One [`CircuitBreaker`] guards exactly one call site. It is a plain owned
//! value: the caller supplies the current time and the permit returned by
//! [`CircuitBreaker::acquire`], which keeps every transition deterministic
//! and testable without a clock.
//!
//! ```text
//! Closed --(threshold consecutive failures)--> Open
//! Open   --(open duration elapsed, next call)--> HalfOpen (single trial)
//! HalfOpen --(trial succeeds)--> Closed
//! HalfOpen --(trial fails)-----> Open (timer restarted)
//! ```

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// State of a circuit breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CircuitState {
    /// Calls flow normally.
    Closed,
    /// Calls are rejected without being attempted.
    Open,
    /// One trial call is testing whether the dependency recovered.
    HalfOpen,
}

impl CircuitState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Open => "open",
            Self::HalfOpen => "half_open",
        }
    }
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A state change, reported so callers can emit observability events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerTransition {
    pub from: CircuitState,
    pub to: CircuitState,
}

/// Admission ticket for one call.
///
/// Must be handed back through `record_success`, `record_failure` or
/// `abandon` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permit {
    trial: bool,
}

impl Permit {
    /// Whether this call is the half-open trial.
    pub fn is_trial(&self) -> bool {
        self.trial
    }
}

/// Outcome of asking the breaker whether a call may proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerDecision {
    Allowed(Permit),
    Rejected {
        /// Time left until the breaker will admit a trial call.
        retry_after: Duration,
    },
}

impl BreakerDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }
}

/// Circuit breaker for one protected call site.
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    failure_threshold: u32,
    open_duration: Duration,
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
    open_count: u32,
}

impl CircuitBreaker {
    /// Create a closed breaker.
    pub fn new(failure_threshold: u32, open_duration: Duration) -> Self {
        Self {
            failure_threshold: failure_threshold.max(1),
            open_duration,
            state: CircuitState::Closed,
            consecutive_failures: 0,
            opened_at: None,
            trial_in_flight: false,
            open_count: 0,
        }
    }

    pub fn state(&self) -> CircuitState {
        self.state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Total times the breaker has opened.
    pub fn open_count(&self) -> u32 {
        self.open_count
    }

    pub fn opened_at(&self) -> Option<Instant> {
        self.opened_at
    }

    /// Decide whether a call may proceed at `now`.
    pub fn acquire(&mut self, now: Instant) -> (BreakerDecision, Option<BreakerTransition>) {
        match self.state {
            CircuitState::Closed => (BreakerDecision::Allowed(Permit { trial: false }), None),
            CircuitState::Open => {
                let reopen_at = self.opened_at.unwrap_or(now) + self.open_duration;
                if now >= reopen_at {
                    let transition = self.transition(CircuitState::HalfOpen);
                    self.trial_in_flight = true;
                    (
                        BreakerDecision::Allowed(Permit { trial: true }),
                        Some(transition),
                    )
                } else {
                    (
                        BreakerDecision::Rejected {
                            retry_after: reopen_at.saturating_duration_since(now),
                        },
                        None,
                    )
                }
            }
            CircuitState::HalfOpen => {
                if self.trial_in_flight {
                    (
                        BreakerDecision::Rejected {
                            retry_after: Duration::ZERO,
                        },
                        None,
                    )
                } else {
                    self.trial_in_flight = true;
                    (BreakerDecision::Allowed(Permit { trial: true }), None)
                }
            }
        }
    }

    /// Record a successful call.
    pub fn record_success(&mut self, permit: Permit) -> Option<BreakerTransition> {
        match self.state {
            CircuitState::HalfOpen if permit.trial => {
                self.trial_in_flight = false;
                self.consecutive_failures = 0;
                self.opened_at = None;
                Some(self.transition(CircuitState::Closed))
            }
            CircuitState::Closed => {
                self.consecutive_failures = 0;
                None
            }
            // Late result of a call admitted before the breaker tripped
            _ => None,
        }
    }

    /// Record a failed call (retries exhausted or permanent failure).
    pub fn record_failure(&mut self, permit: Permit, now: Instant) -> Option<BreakerTransition> {
        match self.state {
            CircuitState::HalfOpen if permit.trial => {
                self.trial_in_flight = false;
                Some(self.trip(now))
            }
            CircuitState::Closed => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                if self.consecutive_failures >= self.failure_threshold {
                    Some(self.trip(now))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Hand back a permit whose call never reported an outcome (e.g. the
    /// caller was cancelled), so a half-open trial slot is not leaked.
    pub fn abandon(&mut self, permit: Permit) {
        if permit.trial && self.state == CircuitState::HalfOpen {
            self.trial_in_flight = false;
        }
    }

    fn trip(&mut self, now: Instant) -> BreakerTransition {
        self.opened_at = Some(now);
        self.open_count = self.open_count.saturating_add(1);
        self.transition(CircuitState::Open)
    }

    fn transition(&mut self, to: CircuitState) -> BreakerTransition {
        let from = self.state;
        self.state = to;
        BreakerTransition { from, to }
    }
}
