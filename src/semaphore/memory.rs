//! In-process semaphore store.

use super::metadata::HeldLock;
use super::types::Semaphore;
use super::{SemaphoreStore, poll_until_locked};
use crate::error::Result;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

/// Semaphore store backed by a mutex-guarded map.
///
/// Every operation runs under the one mutex, which makes acquire and release
/// linearizable per key.
#[derive(Debug, Default)]
pub struct MemorySemaphoreStore {
    claims: Mutex<BTreeMap<String, HeldLock>>,
}

impl MemorySemaphoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a claim held by some other owner since `locked_since`.
    ///
    /// Replaces any existing claim on the key.
    pub fn insert_claim(&self, key: &str, owner: &str, locked_since: DateTime<Utc>) {
        let claim = HeldLock {
            key: key.to_string(),
            owner: owner.to_string(),
            pid: None,
            locked_since,
        };
        self.claims().insert(key.to_string(), claim);
    }

    /// Whether `key` is currently claimed.
    pub fn is_held(&self, key: &str) -> bool {
        self.claims().contains_key(key)
    }

    fn claims(&self) -> MutexGuard<'_, BTreeMap<String, HeldLock>> {
        // A panicking holder cannot leave the map half-updated; every mutation
        // is a single insert or remove.
        self.claims
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    fn try_acquire(&self, key: &str) -> Semaphore {
        match self.claims().entry(key.to_string()) {
            Entry::Occupied(existing) => Semaphore::contended(key, existing.get().locked_since),
            Entry::Vacant(slot) => {
                let claim = slot.insert(HeldLock::new(key));
                Semaphore::claimed(key, claim.locked_since)
            }
        }
    }
}

impl SemaphoreStore for MemorySemaphoreStore {
    fn acquire(&self, key: &str) -> Result<Semaphore> {
        Ok(self.try_acquire(key))
    }

    fn acquire_within(&self, key: &str, max_wait_seconds: u64) -> Result<Semaphore> {
        poll_until_locked(Duration::from_secs(max_wait_seconds), || {
            Ok(self.try_acquire(key))
        })
    }

    fn release(&self, key: &str) -> Result<()> {
        self.claims().remove(key);
        Ok(())
    }

    fn held(&self) -> Result<Vec<HeldLock>> {
        Ok(self.claims().values().cloned().collect())
    }
}
