//! Semaphore observation returned by acquisition attempts.

use chrono::{DateTime, Utc};

/// Result of one acquisition attempt on a lock key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Semaphore {
    /// The lock key.
    pub key: String,

    /// True iff this acquisition call claimed the key for the caller.
    pub locked: bool,

    /// When the current claim was established.
    pub locked_since: DateTime<Utc>,
}

impl Semaphore {
    /// A semaphore the caller just claimed.
    pub fn claimed(key: impl Into<String>, locked_since: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            locked: true,
            locked_since,
        }
    }

    /// A semaphore someone else holds.
    pub fn contended(key: impl Into<String>, locked_since: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            locked: false,
            locked_since,
        }
    }

    /// Milliseconds between `locked_since` and `now`, clamped at zero.
    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> u64 {
        let elapsed = now.signed_duration_since(self.locked_since);
        u64::try_from(elapsed.num_milliseconds()).unwrap_or(0)
    }
}
