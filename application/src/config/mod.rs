//! Application-level configuration.
//!
//! - [`EngineConfig`]: resilience policy, safety settings and handoff
//!   options used to assemble orchestrations

pub mod engine_config;

pub use engine_config::EngineConfig;
