//! Claim metadata stored alongside each held lock.

use crate::duration;
use crate::error::{ProjlockError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A claim currently held in a semaphore store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldLock {
    /// The lock key.
    pub key: String,

    /// Owner of the lock (e.g., `user@HOST`).
    pub owner: String,

    /// Process ID of the lock holder (optional).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u32>,

    /// Timestamp when the claim was established (RFC3339).
    pub locked_since: DateTime<Utc>,
}

impl HeldLock {
    /// Metadata for a claim made by this process right now.
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
            owner: owner_string(),
            pid: Some(std::process::id()),
            locked_since: Utc::now(),
        }
    }

    /// Parse claim metadata from a lock file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            ProjlockError::StoreError(format!(
                "failed to read lock file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })?;

        serde_json::from_str(&content).map_err(|e| {
            ProjlockError::StoreError(format!(
                "failed to parse lock file '{}': {}",
                path.as_ref().display(),
                e
            ))
        })
    }

    /// Serialize claim metadata to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ProjlockError::StoreError(format!("failed to serialize lock metadata: {}", e))
        })
    }

    /// How long the claim has been held.
    pub fn age(&self) -> Duration {
        Utc::now().signed_duration_since(self.locked_since)
    }

    /// The age as a human-readable label.
    pub fn age_label(&self) -> String {
        duration::label_chrono(self.age())
    }

    /// Whether the claim is older than `stale_minutes`.
    pub fn is_stale(&self, stale_minutes: u32) -> bool {
        self.age().num_minutes() > i64::from(stale_minutes)
    }
}

impl std::fmt::Display for HeldLock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (owner: {}, held for: {})",
            self.key,
            self.owner,
            self.age_label()
        )
    }
}

/// Get the owner string for claim metadata.
pub(crate) fn owner_string() -> String {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("USERNAME"))
        .unwrap_or_else(|_| "unknown".to_string());

    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    format!("{}@{}", user, host)
}
