//! Completion-backed agent
//!
//! An [`Agent`] whose `invoke` sends `[system(instructions), ...history,
//! user(input)]` to a [`CompletionService`]. When bound to a
//! [`SessionStore`], history is loaded before each call and the new turn is
//! saved after a successful one.

use crate::ports::agent::{Agent, AgentError};
use crate::ports::completion_service::CompletionService;
use crate::ports::session_store::SessionStore;
use agentflow_domain::Message;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, warn};

struct SessionBinding {
    store: Arc<dyn SessionStore>,
    session_id: String,
    // Serialises load/save so concurrent turns do not drop each other
    turn_lock: tokio::sync::Mutex<()>,
}

/// Agent backed by a remote completion call
pub struct CompletionAgent {
    name: String,
    instructions: String,
    service: Arc<dyn CompletionService>,
    session: Option<SessionBinding>,
}

impl CompletionAgent {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        service: Arc<dyn CompletionService>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            service,
            session: None,
        }
    }

    /// Persist the conversation under `session_id` in `store`.
    pub fn with_session(mut self, store: Arc<dyn SessionStore>, session_id: impl Into<String>) -> Self {
        self.session = Some(SessionBinding {
            store,
            session_id: session_id.into(),
            turn_lock: tokio::sync::Mutex::new(()),
        });
        self
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.session_id.as_str())
    }

    fn build_messages(&self, history: &[Message], input: &str) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() + 2);
        if !self.instructions.is_empty() {
            messages.push(Message::system(self.instructions.clone()));
        }
        messages.extend_from_slice(history);
        messages.push(Message::user(input));
        messages
    }

    async fn invoke_stateless(&self, input: &str) -> Result<String, AgentError> {
        let messages = self.build_messages(&[], input);
        Ok(self.service.send(&messages).await?)
    }

    async fn invoke_with_session(
        &self,
        binding: &SessionBinding,
        input: &str,
    ) -> Result<String, AgentError> {
        let _turn = binding.turn_lock.lock().await;

        let mut history = binding
            .store
            .load(&binding.session_id)
            .await
            .map_err(|e| AgentError::Failed(format!("failed to load session: {}", e)))?
            .unwrap_or_default();
        debug!(
            "Agent {} loaded {} message(s) for session {}",
            self.name,
            history.len(),
            binding.session_id
        );

        let messages = self.build_messages(&history, input);
        let reply = self.service.send(&messages).await?;

        history.push(Message::user(input));
        history.push(Message::assistant(reply.clone()));
        if let Err(e) = binding.store.save(&binding.session_id, &history).await {
            warn!(
                "Agent {} could not save session {}: {}",
                self.name, binding.session_id, e
            );
        }

        Ok(reply)
    }
}

#[async_trait]
impl Agent for CompletionAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(&self, input: &str) -> Result<String, AgentError> {
        match &self.session {
            Some(binding) => self.invoke_with_session(binding, input).await,
            None => self.invoke_stateless(input).await,
        }
    }
}
