//! Session store adapters
//!
//! Implementations of the [`SessionStore`](agentflow_application::SessionStore)
//! port.

mod json_file_store;
mod memory_store;

pub use json_file_store::JsonFileSessionStore;
pub use memory_store::InMemorySessionStore;
