//! Configuration model for projlock.
//!
//! This module defines the Config struct that represents `projlock.yaml`.
//! It supports forward-compatible YAML parsing (unknown fields are ignored),
//! sensible defaults for optional fields, property overrides in the
//! `projlock.*` namespace, and validation of config values.

mod model;
mod operations;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export public API
pub use model::Config;
pub use types::{
    DEFAULT_CONFIG_FILE, DRY_RUN, FORCE_ANALYSIS, PROJECT_KEY, PROJECT_NAME, RunSettings,
};
