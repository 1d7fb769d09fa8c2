//! Session store port
//!
//! Persisted, ordered message history keyed by session id. Consulted by
//! agents or callers, never by the orchestration core itself.

use agentflow_domain::Message;
use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by a session store
#[derive(Error, Debug)]
pub enum SessionStoreError {
    #[error("Invalid session id: {0:?}")]
    InvalidSessionId(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Keyed store for conversation history
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Replace the history stored for `session_id` and refresh its expiry.
    async fn save(&self, session_id: &str, messages: &[Message]) -> Result<(), SessionStoreError>;

    /// Load the history for `session_id`; `None` if absent or expired.
    async fn load(&self, session_id: &str) -> Result<Option<Vec<Message>>, SessionStoreError>;

    /// Remove a session. Returns whether it existed.
    async fn delete(&self, session_id: &str) -> Result<bool, SessionStoreError>;

    /// Ids of all unexpired sessions, sorted.
    async fn list_sessions(&self) -> Result<Vec<String>, SessionStoreError>;
}
