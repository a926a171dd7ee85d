//! Lock applicability rules and lock key derivation.
//!
//! Pure functions over the run context, so every combination of flags can be
//! checked without a store.

use crate::config::RunSettings;
use crate::project::Project;

/// Namespace prefix for project lock keys.
pub const LOCK_KEY_PREFIX: &str = "analysis-";

/// Why locking was skipped for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Rehearsal runs have no durable side effects to protect.
    DryRun,
    /// A blank project key cannot be namespaced into a lock key.
    BlankProjectKey,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::DryRun => write!(f, "dry run"),
            SkipReason::BlankProjectKey => write!(f, "blank project key"),
        }
    }
}

/// Lock key for a project. Distinct project keys yield distinct lock keys.
pub fn lock_key(project_key: &str) -> String {
    format!("{}{}", LOCK_KEY_PREFIX, project_key)
}

/// The reason locking does not apply to this run, if any.
///
/// Rehearsal mode wins over a blank key.
pub fn skip_reason(settings: &RunSettings, project: &Project) -> Option<SkipReason> {
    if settings.dry_run {
        Some(SkipReason::DryRun)
    } else if project.is_blank() {
        Some(SkipReason::BlankProjectKey)
    } else {
        None
    }
}

/// Whether the run must hold the project lock.
pub fn locking_applies(settings: &RunSettings, project: &Project) -> bool {
    skip_reason(settings, project).is_none()
}

/// Whether acquisition seizes the lock regardless of existing ownership.
pub fn should_force(settings: &RunSettings) -> bool {
    settings.force_analysis
}
