//! Event logging subsystem for projlock.
//!
//! Lock transitions are appended to an NDJSON log (one JSON object per line)
//! at `<store_dir>/events.ndjson`, so operators can reconstruct who held a
//! project lock, who was turned away, and who forced it.
//!
//! # Event Format
//!
//! Each event is a JSON object with the following fields:
//! - `ts`: RFC3339 timestamp
//! - `action`: The lock transition (lock_acquired, lock_forced, ...)
//! - `actor`: The owner string (e.g., `user@HOST`)
//! - `key`: Optional lock key
//! - `details`: Freeform object with action-specific details
//!
//! Appending is best-effort from the coordinator's point of view: a failed
//! append is reported as a warning and never aborts a run.

use crate::error::{ProjlockError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the event log inside the store directory.
pub const EVENTS_FILE: &str = "events.ndjson";

/// Actions that can be logged as events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventAction {
    /// Lock claimed by a non-forced run
    LockAcquired,
    /// Lock seized in force mode
    LockForced,
    /// Non-forced run found the lock held and aborted
    LockContended,
    /// Lock released at the end of a run
    LockReleased,
    /// Lock cleared manually by an operator
    LockCleared,
}

impl std::fmt::Display for EventAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventAction::LockAcquired => write!(f, "lock_acquired"),
            EventAction::LockForced => write!(f, "lock_forced"),
            EventAction::LockContended => write!(f, "lock_contended"),
            EventAction::LockReleased => write!(f, "lock_released"),
            EventAction::LockCleared => write!(f, "lock_cleared"),
        }
    }
}

/// An event record for the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// RFC3339 timestamp when the event occurred.
    pub ts: DateTime<Utc>,

    /// The action that was performed.
    pub action: EventAction,

    /// The actor who performed the action (e.g., `user@HOST`).
    pub actor: String,

    /// Lock key the event concerns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Freeform details object with action-specific information.
    pub details: Value,
}

impl Event {
    /// Create a new event with the given action, stamped now.
    pub fn new(action: EventAction) -> Self {
        Self {
            ts: Utc::now(),
            action,
            actor: crate::semaphore::owner_string(),
            key: None,
            details: Value::Object(serde_json::Map::new()),
        }
    }

    /// Set the lock key for this event.
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the details object for this event.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = details;
        self
    }

    /// Serialize the event to a single-line JSON string.
    pub fn to_ndjson_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            ProjlockError::StoreError(format!("failed to serialize event to JSON: {}", e))
        })
    }
}

/// Append-only NDJSON event log.
#[derive(Debug, Clone)]
pub struct EventLog {
    path: PathBuf,
}

impl EventLog {
    /// Event log stored in `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            path: dir.join(EVENTS_FILE),
        }
    }

    /// Path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append an event as one line, creating the file and its directory if needed.
    pub fn append(&self, event: &Event) -> Result<()> {
        let json_line = event.to_ndjson_line()?;

        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| {
                ProjlockError::StoreError(format!(
                    "failed to create events directory '{}': {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                ProjlockError::StoreError(format!(
                    "failed to open events file '{}': {}",
                    self.path.display(),
                    e
                ))
            })?;

        writeln!(file, "{}", json_line).map_err(|e| {
            ProjlockError::StoreError(format!(
                "failed to write event to '{}': {}",
                self.path.display(),
                e
            ))
        })?;

        file.sync_all().map_err(|e| {
            ProjlockError::StoreError(format!(
                "failed to sync events file '{}': {}",
                self.path.display(),
                e
            ))
        })
    }

    /// Append an event, downgrading failure to a warning.
    pub fn record(&self, event: &Event) {
        if let Err(e) = self.append(event) {
            tracing::warn!(action = %event.action, error = %e, "failed to log event");
        }
    }

    /// Read every event in the log; a missing file is an empty log.
    pub fn read_all(&self) -> Result<Vec<Event>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(ProjlockError::StoreError(format!(
                    "failed to read events file '{}': {}",
                    self.path.display(),
                    e
                )));
            }
        };

        content
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| {
                serde_json::from_str(line).map_err(|e| {
                    ProjlockError::StoreError(format!("failed to parse event line: {}", e))
                })
            })
            .collect()
    }
}
