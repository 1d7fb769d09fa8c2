//! Domain layer for agentflow
//!
//! This crate contains the pure rules of the orchestration core: value
//! objects, the circuit breaker state machine and the content safety gate.
//! It has no dependencies on async runtimes, I/O or logging.
//!
//! # Core Concepts
//!
//! ## Resilience
//!
//! - **ResiliencePolicy**: timeout, retry with exponential backoff, breaker
//!   thresholds and the fallback text
//! - **CircuitBreaker**: Closed / Open / HalfOpen state machine driven by
//!   call outcomes and an externally supplied clock
//!
//! ## Safety
//!
//! - **ContentSafetyGate**: length, PII, jailbreak and blocklist checks on
//!   inbound text, PII redaction on outbound text
//!
//! ## Orchestration
//!
//! - **HandoffRule**: extracts the next agent's name from a response

pub mod core;
pub mod orchestration;
pub mod resilience;
pub mod safety;
pub mod session;

// Re-export commonly used types
pub use core::{
    error::DomainError,
    validation::{ConfigIssue, ConfigIssueCode, Severity},
};
pub use orchestration::{
    handoff::{DEFAULT_HANDOFF_PATTERN, HandoffRule},
    value_objects::{HandoffOutcome, HandoffTermination},
};
pub use resilience::{
    circuit_breaker::{BreakerDecision, BreakerTransition, CircuitBreaker, CircuitState, Permit},
    policy::{DEFAULT_FALLBACK_TEXT, ResiliencePolicy},
};
pub use safety::{
    gate::{ContentSafetyGate, DEFAULT_MAX_INPUT_LENGTH, SafetySettings},
    result::{Finding, NO_ISSUES_DETAIL, PiiKind, SafetyResult, ViolationKind},
};
pub use session::entities::{Message, Role};
