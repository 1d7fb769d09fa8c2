//! In-memory session store with the same expiry contract as the file store.

use agentflow_application::{SessionStore, SessionStoreError};
use agentflow_domain::Message;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry {
    session_id: String,
    saved_at: Instant,
    messages: Vec<Message>,
}

/// Process-local session store
pub struct InMemorySessionStore {
    namespace: String,
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl InMemorySessionStore {
    pub fn new(namespace: impl Into<String>, ttl: Duration) -> Self {
        Self {
            namespace: namespace.into(),
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn key(&self, session_id: &str) -> Result<String, SessionStoreError> {
        if session_id.trim().is_empty() {
            return Err(SessionStoreError::InvalidSessionId(session_id.to_string()));
        }
        Ok(format!("{}:{}", self.namespace, session_id))
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn save(&self, session_id: &str, messages: &[Message]) -> Result<(), SessionStoreError> {
        let key = self.key(session_id)?;
        self.entries().insert(
            key,
            Entry {
                session_id: session_id.to_string(),
                saved_at: Instant::now(),
                messages: messages.to_vec(),
            },
        );
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<Vec<Message>>, SessionStoreError> {
        let key = self.key(session_id)?;
        let mut entries = self.entries();
        let expired = match entries.get(&key) {
            None => return Ok(None),
            Some(entry) => entry.saved_at.elapsed() > self.ttl,
        };
        if expired {
            entries.remove(&key);
            return Ok(None);
        }
        Ok(entries.get(&key).map(|entry| entry.messages.clone()))
    }

    async fn delete(&self, session_id: &str) -> Result<bool, SessionStoreError> {
        let key = self.key(session_id)?;
        Ok(self.entries().remove(&key).is_some())
    }

    async fn list_sessions(&self) -> Result<Vec<String>, SessionStoreError> {
        let mut entries = self.entries();
        let ttl = self.ttl;
        entries.retain(|_, entry| entry.saved_at.elapsed() <= ttl);

        let mut ids: Vec<String> = entries.values().map(|e| e.session_id.clone()).collect();
        ids.sort();
        Ok(ids)
    }
}
