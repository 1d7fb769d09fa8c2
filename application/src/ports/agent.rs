//! Agent port
//!
//! An agent is a named unit exposing a single text-to-text operation. The
//! orchestration engine treats it as an opaque capability.

use super::completion_service::CompletionError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors an agent invocation can fail with
#[derive(Error, Debug, Clone)]
pub enum AgentError {
    #[error("Completion error: {0}")]
    Completion(#[from] CompletionError),

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    #[error("Agent failed: {0}")]
    Failed(String),

    #[error("Request rejected: {0}")]
    Rejected(String),
}

impl AgentError {
    /// Whether retrying the same call might succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            AgentError::Completion(e) => e.is_transient(),
            AgentError::Timeout(_) | AgentError::Failed(_) => true,
            AgentError::Rejected(_) => false,
        }
    }
}

/// A named, independently invokable unit of work.
///
/// Implementations must be usable from several tasks at once; the engine
/// never holds mutable state on an agent's behalf.
#[async_trait]
pub trait Agent: Send + Sync {
    /// Name used for routing and error reporting. Unique within an
    /// orchestrator.
    fn name(&self) -> &str;

    /// Run the agent on `input` and return its text output.
    async fn invoke(&self, input: &str) -> Result<String, AgentError>;
}

#[async_trait]
impl<A: Agent + ?Sized> Agent for Arc<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn invoke(&self, input: &str) -> Result<String, AgentError> {
        (**self).invoke(input).await
    }
}

#[async_trait]
impl<A: Agent + ?Sized> Agent for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn invoke(&self, input: &str) -> Result<String, AgentError> {
        (**self).invoke(input).await
    }
}
