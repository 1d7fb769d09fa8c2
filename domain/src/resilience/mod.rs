//! Resilience domain
//!
//! Policy values and the circuit breaker state machine used by the
//! resilient agent wrapper in the application layer.

pub mod circuit_breaker;
pub mod policy;
