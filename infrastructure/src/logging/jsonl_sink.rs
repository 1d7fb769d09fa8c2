//! JSONL file writer for resilience events.
//!
//! Each [`ResilienceEvent`] is serialized as a single JSON line with `type`,
//! `timestamp` and `agent` fields merged into its attributes, appended to
//! the file via a buffered writer.

use agentflow_application::{ObservabilitySink, ResilienceEvent};
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Event sink that appends one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes on `Drop`.
pub struct JsonlEventSink {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
}

impl JsonlEventSink {
    /// Open (or create) the file at `path` for appending.
    ///
    /// Creates parent directories if they don't exist.
    /// Returns `None` if the file cannot be opened.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create event log directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open event log file {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
        })
    }

    /// Get the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn to_record(event: ResilienceEvent, timestamp: String) -> Value {
    let mut map = match event.attributes {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    map.insert(
        "type".to_string(),
        Value::String(event.kind.as_str().to_string()),
    );
    map.insert("timestamp".to_string(), Value::String(timestamp));
    map.insert("agent".to_string(), Value::String(event.agent));
    Value::Object(map)
}

impl ObservabilitySink for JsonlEventSink {
    fn record(&self, event: ResilienceEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
        let record = to_record(event, timestamp);

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlEventSink {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
