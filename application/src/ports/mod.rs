//! Port definitions (interfaces for external adapters)
//!
//! Ports define the contracts that infrastructure adapters must implement.

pub mod agent;
pub mod completion_service;
pub mod observability;
pub mod session_store;
