//! Project lock coordinator.
//!
//! Gates the start and end of an analysis run on the project's semaphore:
//!
//! 1. `start()` skips locking for rehearsal runs and blank project keys.
//! 2. In force mode it calls `acquire_within(key, 0)` and proceeds as the
//!    owner whatever the store answers.
//! 3. Otherwise it makes exactly one `acquire(key)` attempt. If the key is
//!    held, the run fails with [`ProjlockError::AlreadyRunning`] carrying a
//!    diagnostic with the elapsed time and the force property. There is no
//!    retry and no polling here; waiting, if any, belongs to the store.
//! 4. `stop()` releases the key, but only if the matching `start()` acquired
//!    or forced it. A run turned away by contention never releases, so it
//!    cannot clear the legitimate holder's claim.
//!
//! The store is the only synchronization point; the coordinator keeps no
//! lock state besides the key it took.

mod message;
mod policy;


pub use message::contention_message;
pub use policy::{LOCK_KEY_PREFIX, SkipReason, lock_key, locking_applies, should_force, skip_reason};

use crate::config::RunSettings;
use crate::error::{ProjlockError, Result};
use crate::events::{Event, EventAction, EventLog};
use crate::project::Project;
use crate::semaphore::SemaphoreStore;
use chrono::{DateTime, Utc};
use serde_json::json;

/// What `start()` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    /// Locking did not apply; the run proceeds unguarded.
    Skipped(SkipReason),
    /// The lock was free and is now held by this run.
    Acquired,
    /// Force mode; `held_since` is set when another claim existed.
    Forced { held_since: Option<DateTime<Utc>> },
}

/// Exclusive lock around one analysis run of a project.
#[derive(Debug)]
pub struct ProjectLock<S> {
    store: S,
    project: Project,
    settings: RunSettings,
    events: Option<EventLog>,
    held_key: Option<String>,
}

impl<S: SemaphoreStore> ProjectLock<S> {
    pub fn new(store: S, project: Project, settings: RunSettings) -> Self {
        Self {
            store,
            project,
            settings,
            events: None,
            held_key: None,
        }
    }

    /// Record lock transitions in `events`.
    pub fn with_event_log(mut self, events: EventLog) -> Self {
        self.events = Some(events);
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether this run currently holds the project lock.
    pub fn is_held(&self) -> bool {
        self.held_key.is_some()
    }

    /// Acquire the project lock before the run begins.
    pub fn start(&mut self) -> Result<LockOutcome> {
        if let Some(key) = &self.held_key {
            return Err(ProjlockError::UserError(format!(
                "lock '{}' is already held by this run",
                key
            )));
        }

        if let Some(reason) = skip_reason(&self.settings, &self.project) {
            tracing::debug!(project = %self.project, %reason, "locking skipped");
            return Ok(LockOutcome::Skipped(reason));
        }

        let key = lock_key(&self.project.key);

        if should_force(&self.settings) {
            tracing::debug!(project = %self.project, key = %key, "acquiring semaphore in force mode");
            let semaphore = self.store.acquire_within(&key, 0)?;

            let held_since = if semaphore.locked {
                None
            } else {
                tracing::warn!(
                    project = %self.project,
                    key = %key,
                    held_since = %semaphore.locked_since,
                    "forcing analysis over an existing lock"
                );
                Some(semaphore.locked_since)
            };

            self.record(
                Event::new(EventAction::LockForced)
                    .with_key(&key)
                    .with_details(json!({
                        "project": self.project.key,
                        "previously_held_since": held_since,
                    })),
            );
            self.held_key = Some(key);
            return Ok(LockOutcome::Forced { held_since });
        }

        tracing::debug!(project = %self.project, key = %key, "acquiring semaphore");
        let semaphore = self.store.acquire(&key)?;

        if !semaphore.locked {
            let held_for_ms = self.store.duration_since_locked(&semaphore);
            let message = contention_message(&self.project.name, held_for_ms);
            tracing::error!("{}", message);

            self.record(
                Event::new(EventAction::LockContended)
                    .with_key(&key)
                    .with_details(json!({
                        "project": self.project.key,
                        "held_since": semaphore.locked_since,
                        "held_for_ms": held_for_ms,
                    })),
            );
            return Err(ProjlockError::AlreadyRunning(message));
        }

        self.record(
            Event::new(EventAction::LockAcquired)
                .with_key(&key)
                .with_details(json!({ "project": self.project.key })),
        );
        self.held_key = Some(key);
        Ok(LockOutcome::Acquired)
    }

    /// Release the project lock after the run ends, successful or not.
    ///
    /// A no-op for rehearsal runs and for runs whose `start()` did not take
    /// the lock.
    pub fn stop(&mut self) -> Result<()> {
        if self.settings.dry_run {
            return Ok(());
        }

        let Some(key) = self.held_key.take() else {
            tracing::debug!(project = %self.project, "no lock held; nothing to release");
            return Ok(());
        };

        tracing::debug!(project = %self.project, key = %key, "releasing semaphore");
        if let Err(e) = self.store.release(&key) {
            // Keep the key so the caller can retry the release.
            self.held_key = Some(key);
            return Err(e);
        }

        self.record(
            Event::new(EventAction::LockReleased)
                .with_key(&key)
                .with_details(json!({ "project": self.project.key })),
        );
        Ok(())
    }

    /// Run `work` under the project lock, passing it the start outcome.
    ///
    /// The lock is released whether `work` succeeds or fails. If both `work`
    /// and the release fail, `work`'s error is returned and the release
    /// failure is logged.
    pub fn run<T, F>(&mut self, work: F) -> Result<T>
    where
        F: FnOnce(LockOutcome) -> Result<T>,
    {
        let outcome = self.start()?;
        let result = work(outcome);
        let released = self.stop();

        match (result, released) {
            (Ok(value), Ok(())) => Ok(value),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(release_err)) => {
                tracing::error!(project = %self.project, error = %release_err, "failed to release lock after failed run");
                Err(e)
            }
        }
    }

    fn record(&self, event: Event) {
        if let Some(events) = &self.events {
            events.record(&event);
        }
    }
}
