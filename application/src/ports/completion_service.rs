//! Completion service port
//!
//! The remote text-completion primitive agents are built on. Vendor clients
//! live outside this workspace and implement [`CompletionService`].

use agentflow_domain::Message;
use async_trait::async_trait;
use thiserror::Error;

/// Errors returned by a completion service
#[derive(Error, Debug, Clone)]
pub enum CompletionError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Authentication failed: {0}")]
    Authentication(String),
}

impl CompletionError {
    /// Connection problems, rate limits and outages are worth retrying;
    /// malformed or unauthorised requests are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CompletionError::Connection(_)
                | CompletionError::RateLimited(_)
                | CompletionError::Unavailable(_)
        )
    }
}

/// A hosted completion service
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Send an ordered conversation and return the reply text.
    async fn send(&self, messages: &[Message]) -> Result<String, CompletionError>;
}
