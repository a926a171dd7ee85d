//! Property names, run settings, and defaults for projlock.

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "projlock.yaml";

/// Property that turns a run into a rehearsal: no locking, no side effects.
pub const DRY_RUN: &str = "projlock.dryRun";

/// Property that seizes the project lock even when another run holds it.
pub const FORCE_ANALYSIS: &str = "projlock.forceAnalysis";

/// Property naming the project key.
pub const PROJECT_KEY: &str = "projlock.projectKey";

/// Property naming the project display name.
pub const PROJECT_NAME: &str = "projlock.projectName";

/// The flags the lock coordinator reads for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSettings {
    /// Rehearsal mode: locking is skipped entirely.
    pub dry_run: bool,

    /// Force mode: seize the lock regardless of existing ownership.
    pub force_analysis: bool,
}

impl RunSettings {
    pub fn new(dry_run: bool, force_analysis: bool) -> Self {
        Self {
            dry_run,
            force_analysis,
        }
    }
}

/// Parse a boolean property value (`true`/`false`, case-insensitive).
pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

// Default value functions for serde
pub(crate) fn default_store_dir() -> String {
    ".projlock/locks".to_string()
}
pub(crate) fn default_lock_stale_minutes() -> u32 {
    120
}
