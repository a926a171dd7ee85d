//! Semaphore stores for projlock.
//!
//! A semaphore store is the shared, atomic test-and-set that every worker
//! process consults before starting an analysis run. The coordinator performs
//! no synchronization of its own, so a store must guarantee that among
//! concurrent `acquire` calls on the same key exactly one observes
//! `locked = true` until the key is released.
//!
//! # Stores
//!
//! - [`FileSemaphoreStore`]: one lock file per key, created with
//!   **create_new** semantics (exclusive create). Works across processes on
//!   the same machine or a shared filesystem.
//! - [`MemorySemaphoreStore`]: a mutex-guarded map for coordinating threads
//!   within one process.
//!
//! # Lock Metadata
//!
//! Each claim records who holds it:
//! - `key`: the lock key
//! - `owner`: the holder (e.g., `user@HOST`)
//! - `pid`: the process ID (optional)
//! - `locked_since`: RFC3339 timestamp of the claim

mod file;
mod memory;
mod metadata;
mod types;


use crate::error::Result;
use chrono::Utc;
use std::time::{Duration, Instant};

pub use file::FileSemaphoreStore;
pub use memory::MemorySemaphoreStore;
pub use metadata::HeldLock;
pub(crate) use metadata::owner_string;
pub use types::Semaphore;

/// Interval between attempts while waiting for a lock to free up.
pub(crate) const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Contract the lock coordinator requires from a semaphore store.
pub trait SemaphoreStore {
    /// Attempt to claim `key` using the store's default wait.
    ///
    /// Returns `locked = true` if this call claimed the key. If the key is
    /// already claimed (by anyone, including an earlier session of the
    /// caller) returns `locked = false` with the original claim time and
    /// leaves the claim untouched.
    fn acquire(&self, key: &str) -> Result<Semaphore>;

    /// Attempt to claim `key`, waiting up to `max_wait_seconds` for it to
    /// become free. `0` means a single attempt.
    fn acquire_within(&self, key: &str, max_wait_seconds: u64) -> Result<Semaphore>;

    /// Remove the claim on `key`. Releasing a free key is a no-op.
    fn release(&self, key: &str) -> Result<()>;

    /// List every current claim, sorted by key.
    fn held(&self) -> Result<Vec<HeldLock>>;

    /// Milliseconds elapsed since the semaphore's claim was established.
    fn duration_since_locked(&self, semaphore: &Semaphore) -> u64 {
        semaphore.elapsed_ms(Utc::now())
    }
}

impl<S: SemaphoreStore + ?Sized> SemaphoreStore for &S {
    fn acquire(&self, key: &str) -> Result<Semaphore> {
        (**self).acquire(key)
    }

    fn acquire_within(&self, key: &str, max_wait_seconds: u64) -> Result<Semaphore> {
        (**self).acquire_within(key, max_wait_seconds)
    }

    fn release(&self, key: &str) -> Result<()> {
        (**self).release(key)
    }

    fn held(&self) -> Result<Vec<HeldLock>> {
        (**self).held()
    }

    fn duration_since_locked(&self, semaphore: &Semaphore) -> u64 {
        (**self).duration_since_locked(semaphore)
    }
}

/// Repeat `attempt` until it reports a claim or `max_wait` has elapsed.
///
/// The last observation is returned either way, so a contended result still
/// carries the current holder's `locked_since`. A wait too large to represent
/// as a deadline means waiting until the key frees up.
pub(crate) fn poll_until_locked<F>(max_wait: Duration, mut attempt: F) -> Result<Semaphore>
where
    F: FnMut() -> Result<Semaphore>,
{
    let deadline = Instant::now().checked_add(max_wait);
    loop {
        let semaphore = attempt()?;
        let expired = deadline.is_some_and(|deadline| Instant::now() >= deadline);
        if semaphore.locked || expired {
            return Ok(semaphore);
        }
        std::thread::sleep(POLL_INTERVAL);
    }
}
