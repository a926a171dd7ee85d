use crate::error::{ProjlockError, Result};
use crate::semaphore::{HeldLock, MemorySemaphoreStore, Semaphore, SemaphoreStore};
use chrono::{Duration, Utc};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A call made to a [`RecordingStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreCall {
    Acquire(String),
    AcquireWithin(String, u64),
    Release(String),
    DurationSinceLocked(String),
    Held,
}

/// Memory store that records every call made through the store contract.
#[derive(Debug, Default)]
pub(crate) struct RecordingStore {
    inner: MemorySemaphoreStore,
    calls: Mutex<Vec<StoreCall>>,
    fail_acquire: bool,
    fail_release: bool,
}

impl RecordingStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// A store whose `release` always fails.
    pub(crate) fn failing_release() -> Self {
        Self {
            fail_release: true,
            ..Self::default()
        }
    }

    /// A store whose `acquire` and `acquire_within` always fail.
    pub(crate) fn failing_acquire() -> Self {
        Self {
            fail_acquire: true,
            ..Self::default()
        }
    }

    /// Put `key` in the hands of another owner who took it `minutes_ago`.
    pub(crate) fn held_by_other(&self, key: &str, minutes_ago: i64) {
        self.inner
            .insert_claim(key, "other@worker-2", Utc::now() - Duration::minutes(minutes_ago));
    }

    pub(crate) fn is_held(&self, key: &str) -> bool {
        self.inner.is_held(key)
    }

    pub(crate) fn calls(&self) -> Vec<StoreCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }

    fn push(&self, call: StoreCall) {
        self.calls
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .push(call);
    }
}

impl SemaphoreStore for RecordingStore {
    fn acquire(&self, key: &str) -> Result<Semaphore> {
        self.push(StoreCall::Acquire(key.to_string()));
        if self.fail_acquire {
            return Err(unreachable_store());
        }
        self.inner.acquire(key)
    }

    fn acquire_within(&self, key: &str, max_wait_seconds: u64) -> Result<Semaphore> {
        self.push(StoreCall::AcquireWithin(key.to_string(), max_wait_seconds));
        if self.fail_acquire {
            return Err(unreachable_store());
        }
        self.inner.acquire_within(key, max_wait_seconds)
    }

    fn release(&self, key: &str) -> Result<()> {
        self.push(StoreCall::Release(key.to_string()));
        if self.fail_release {
            return Err(unreachable_store());
        }
        self.inner.release(key)
    }

    fn held(&self) -> Result<Vec<HeldLock>> {
        self.push(StoreCall::Held);
        self.inner.held()
    }

    fn duration_since_locked(&self, semaphore: &Semaphore) -> u64 {
        self.push(StoreCall::DurationSinceLocked(semaphore.key.clone()));
        self.inner.duration_since_locked(semaphore)
    }
}

fn unreachable_store() -> ProjlockError {
    ProjlockError::StoreError("store unreachable".to_string())
}
