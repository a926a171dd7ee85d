//! Config struct definition and default implementation.

use super::types::*;
use serde::{Deserialize, Serialize};

/// Configuration for projlock.
///
/// This struct represents the contents of `projlock.yaml`.
/// Unknown fields in the YAML are ignored for forward compatibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // =========================================================================
    // Store settings
    // =========================================================================
    /// Directory holding lock files and the event log.
    #[serde(default = "default_store_dir")]
    pub store_dir: String,

    /// Minutes after which a held lock is reported as stale.
    #[serde(default = "default_lock_stale_minutes")]
    pub lock_stale_minutes: u32,

    /// Seconds a non-forced acquisition waits for a held lock to free up.
    #[serde(default)]
    pub lock_wait_seconds: u64,

    // =========================================================================
    // Run settings
    // =========================================================================
    /// Rehearsal mode (`projlock.dryRun`).
    #[serde(default)]
    pub dry_run: bool,

    /// Force mode (`projlock.forceAnalysis`).
    #[serde(default)]
    pub force_analysis: bool,

    // =========================================================================
    // Project settings
    // =========================================================================
    /// Key of the project being analyzed (`projlock.projectKey`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,

    /// Display name of the project (`projlock.projectName`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_dir: default_store_dir(),
            lock_stale_minutes: default_lock_stale_minutes(),
            lock_wait_seconds: 0,
            dry_run: false,
            force_analysis: false,
            project_key: None,
            project_name: None,
        }
    }
}
