//! File-backed session store.
//!
//! One JSON document per session, stored under the namespaced key
//! `<namespace>:<session_id>`. Records carry `saved_at` and expire after the
//! configured TTL: expired records are treated as absent and removed.

use agentflow_application::{SessionStore, SessionStoreError};
use agentflow_domain::Message;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

/// Persisted form of one session
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SessionRecord {
    key: String,
    session_id: String,
    saved_at: DateTime<Utc>,
    message_count: usize,
    messages: Vec<Message>,
}

/// Session store writing JSON files into a directory
pub struct JsonFileSessionStore {
    directory: PathBuf,
    namespace: String,
    ttl: Duration,
}

impl JsonFileSessionStore {
    pub fn new(directory: impl Into<PathBuf>, namespace: impl Into<String>, ttl: Duration) -> Self {
        Self {
            directory: directory.into(),
            namespace: namespace.into(),
            ttl,
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Namespaced key for a session id.
    pub fn key(&self, session_id: &str) -> String {
        format!("{}:{}", self.namespace, session_id)
    }

    fn path_for(&self, session_id: &str) -> PathBuf {
        self.directory
            .join(format!("{}.json", encode_file_name(&self.key(session_id))))
    }

    fn is_expired(&self, saved_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        (now - saved_at)
            .to_std()
            .map(|age| age > self.ttl)
            .unwrap_or(false)
    }

    async fn read_record(&self, path: &Path) -> Result<Option<SessionRecord>, SessionStoreError> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove_file(path: &Path) -> Result<bool, SessionStoreError> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

/// Encode a key into a portable file name.
///
/// ASCII alphanumerics, `-`, `_` and `.` are kept; every other byte is
/// written as `%XX`, so distinct keys never share a file.
fn encode_file_name(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'-' | b'_' | b'.') {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

/// Write `bytes` to a uniquely named temporary file in `directory`, then
/// rename it over `path`. Readers never see a partial document, and
/// concurrent writers of the same session never share a temporary file.
async fn write_atomic(directory: PathBuf, path: PathBuf, bytes: Vec<u8>) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || {
        let mut tmp = tempfile::Builder::new()
            .prefix(".session-")
            .suffix(".tmp")
            .tempfile_in(&directory)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path)?;
        Ok::<(), std::io::Error>(())
    })
    .await
    .map_err(std::io::Error::other)?
}

fn validate_session_id(session_id: &str) -> Result<(), SessionStoreError> {
    if session_id.trim().is_empty() {
        return Err(SessionStoreError::InvalidSessionId(session_id.to_string()));
    }
    Ok(())
}

#[async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn save(&self, session_id: &str, messages: &[Message]) -> Result<(), SessionStoreError> {
        validate_session_id(session_id)?;
        tokio::fs::create_dir_all(&self.directory).await?;

        let record = SessionRecord {
            key: self.key(session_id),
            session_id: session_id.to_string(),
            saved_at: Utc::now(),
            message_count: messages.len(),
            messages: messages.to_vec(),
        };
        let bytes = serde_json::to_vec_pretty(&record)?;

        let path = self.path_for(session_id);
        write_atomic(self.directory.clone(), path.clone(), bytes).await?;

        debug!(
            "Saved session {} ({} messages) to {}",
            record.key,
            record.message_count,
            path.display()
        );
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<Vec<Message>>, SessionStoreError> {
        validate_session_id(session_id)?;
        let path = self.path_for(session_id);

        let Some(record) = self.read_record(&path).await? else {
            return Ok(None);
        };

        if self.is_expired(record.saved_at, Utc::now()) {
            debug!("Session {} expired, removing", record.key);
            Self::remove_file(&path).await?;
            return Ok(None);
        }

        Ok(Some(record.messages))
    }

    async fn delete(&self, session_id: &str) -> Result<bool, SessionStoreError> {
        validate_session_id(session_id)?;
        Self::remove_file(&self.path_for(session_id)).await
    }

    async fn list_sessions(&self) -> Result<Vec<String>, SessionStoreError> {
        let mut entries = match tokio::fs::read_dir(&self.directory).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let prefix = format!("{}:", self.namespace);
        let now = Utc::now();
        let mut ids = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }

            let record = match self.read_record(&path).await {
                Ok(Some(record)) => record,
                Ok(None) => continue,
                Err(e) => {
                    warn!("Skipping unreadable session file {}: {}", path.display(), e);
                    continue;
                }
            };

            if !record.key.starts_with(&prefix) {
                continue;
            }
            if self.is_expired(record.saved_at, now) {
                Self::remove_file(&path).await?;
                continue;
            }
            ids.push(record.session_id);
        }

        ids.sort();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEEK: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    fn store(dir: &Path) -> JsonFileSessionStore {
        JsonFileSessionStore::new(dir, "agent:thread", WEEK)
    }

    fn conversation() -> Vec<Message> {
        vec![Message::user("hello"), Message::assistant("hi there")]
    }

    #[test]
    fn test_encode_file_name() {
        assert_eq!(encode_file_name("agent:thread:abc-1"), "agent%3Athread%3Aabc-1");
        assert_eq!(encode_file_name("a/b"), "a%2Fb");
        assert_ne!(encode_file_name("a:b"), encode_file_name("a_b"));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        store.save("t1", &conversation()).await.unwrap();
        assert_eq!(store.load("t1").await.unwrap(), Some(conversation()));
    }

    #[tokio::test]
    async fn test_record_metadata_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.save("t1", &conversation()).await.unwrap();

        let raw = std::fs::read_to_string(store.path_for("t1")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["key"], "agent:thread:t1");
        assert_eq!(value["message_count"], 2);
        assert!(value["saved_at"].is_string());
    }

    #[tokio::test]
    async fn test_load_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(store(dir.path()).load("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_replaces_history() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        store.save("t1", &conversation()).await.unwrap();
        store.save("t1", &[Message::user("fresh")]).await.unwrap();
        assert_eq!(
            store.load("t1").await.unwrap(),
            Some(vec![Message::user("fresh")])
        );
    }

    #[tokio::test]
    async fn test_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.save("t1", &conversation()).await.unwrap();

        assert!(store.delete("t1").await.unwrap());
        assert!(!store.delete("t1").await.unwrap());
        assert_eq!(store.load("t1").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_list_sessions_is_sorted_and_namespaced() {
        let dir = tempfile::tempdir().unwrap();
        let ours = store(dir.path());
        let other = JsonFileSessionStore::new(dir.path(), "other", WEEK);

        ours.save("b", &conversation()).await.unwrap();
        ours.save("a", &conversation()).await.unwrap();
        other.save("c", &conversation()).await.unwrap();

        assert_eq!(ours.list_sessions().await.unwrap(), vec!["a", "b"]);
        assert_eq!(other.list_sessions().await.unwrap(), vec!["c"]);
    }

    #[tokio::test]
    async fn test_list_sessions_on_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(&dir.path().join("not-created"));
        assert!(store.list_sessions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_expired_session_is_absent_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.save("old", &conversation()).await.unwrap();
        store.save("new", &conversation()).await.unwrap();

        // Backdate one record past the TTL
        let path = store.path_for("old");
        let mut value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let eight_days_ago = Utc::now() - chrono::Duration::days(8);
        value["saved_at"] = serde_json::json!(eight_days_ago);
        std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

        assert_eq!(store.list_sessions().await.unwrap(), vec!["new"]);
        assert!(!path.exists());
        assert_eq!(store.load("old").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_concurrent_saves_of_one_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(store(dir.path()));

        let mut tasks = tokio::task::JoinSet::new();
        for i in 0..8 {
            let store = store.clone();
            tasks.spawn(async move {
                store
                    .save("shared", &[Message::user(format!("turn {}", i))])
                    .await
            });
        }
        while let Some(result) = tasks.join_next().await {
            result.unwrap().unwrap();
        }

        let messages = store.load("shared").await.unwrap().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].content.starts_with("turn "));

        let leftovers = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|entry| entry.path().extension().and_then(|e| e.to_str()) == Some("tmp"))
            .count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn test_empty_session_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = store(dir.path()).save(" ", &[]).await.unwrap_err();
        assert!(matches!(err, SessionStoreError::InvalidSessionId(_)));
    }
}
