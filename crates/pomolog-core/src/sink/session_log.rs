//! JSON-array session log file.
//!
//! The backend's storage format: one JSON array of session event
//! records. Append is a read-modify-write of the whole array, which
//! keeps the file valid JSON at every point and matches what the
//! server writes. A missing or empty file reads as an empty history.

use std::path::{Path, PathBuf};

use crate::error::{CoreError, SinkError};
use crate::events::SessionEvent;
use crate::sink::{EventSink, HistorySource};
use crate::storage::data_dir;

pub const LOG_FILE_NAME: &str = "sessions.log";

/// File-backed event log.
#[derive(Debug, Clone)]
pub struct SessionLog {
    path: PathBuf,
}

impl SessionLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Log at `sessions.log` under the data directory.
    pub fn open_default() -> Result<Self, CoreError> {
        Ok(Self::new(data_dir()?.join(LOG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record.
    ///
    /// # Errors
    /// Returns an error if the existing log cannot be read or parsed,
    /// or the rewritten file cannot be stored.
    pub fn append(&self, event: &SessionEvent) -> Result<(), SinkError> {
        let mut events = self.read_all()?;
        events.push(event.clone());
        let json = serde_json::to_string_pretty(&events)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// All recorded events, chronological. Missing and empty files are
    /// empty histories, not errors.
    pub fn read_all(&self) -> Result<Vec<SessionEvent>, SinkError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(Vec::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(SinkError::Io(e)),
        }
    }
}

impl EventSink for SessionLog {
    fn submit(&self, event: &SessionEvent) {
        if let Err(e) = self.append(event) {
            tracing::warn!(
                "failed to append session event to {}: {e}",
                self.path.display()
            );
        }
    }
}

impl HistorySource for SessionLog {
    fn fetch_history(&self) -> Result<Vec<SessionEvent>, SinkError> {
        self.read_all()
    }
}
