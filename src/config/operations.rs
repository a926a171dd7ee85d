//! Config loading, validation, and property overrides.

use super::model::Config;
use super::types::{
    DEFAULT_CONFIG_FILE, DRY_RUN, FORCE_ANALYSIS, PROJECT_KEY, PROJECT_NAME, RunSettings,
    parse_bool,
};
use crate::error::{ProjlockError, Result};
use crate::project::Project;
use std::path::Path;

impl Config {
    /// Load config from a YAML file.
    ///
    /// Unknown fields in the YAML are silently ignored for forward compatibility.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            ProjlockError::UserError(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Resolve the config for a command.
    ///
    /// An explicit path must exist. Without one, `projlock.yaml` in `dir` is
    /// used when present, otherwise defaults apply.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "loading config");
            Self::load(candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Resolve the config relative to the current working directory.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| {
            ProjlockError::UserError(format!("failed to get current working directory: {}", e))
        })?;
        Self::resolve(explicit, &cwd)
    }

    /// Parse config from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml).map_err(|e| {
            ProjlockError::UserError(format!("failed to parse config YAML: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| {
            ProjlockError::UserError(format!("failed to serialize config to YAML: {}", e))
        })
    }

    /// Validate config values and return error on invalid values.
    ///
    /// Validation rules:
    /// - `lock_stale_minutes` must be positive
    /// - `store_dir` must be non-empty
    pub fn validate(&self) -> Result<()> {
        if self.lock_stale_minutes == 0 {
            return Err(ProjlockError::UserError(
                "config validation failed: lock_stale_minutes must be greater than 0".to_string(),
            ));
        }

        if self.store_dir.trim().is_empty() {
            return Err(ProjlockError::UserError(
                "config validation failed: store_dir must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Apply a `key=value` property override (as given to `-D`).
    ///
    /// Unknown property names are ignored with a warning.
    pub fn apply_define(&mut self, define: &str) -> Result<()> {
        let (key, value) = define.split_once('=').ok_or_else(|| {
            ProjlockError::UserError(format!(
                "invalid property '{}': expected key=value",
                define
            ))
        })?;
        self.apply_property(key.trim(), value)
    }

    /// Apply a single property override.
    pub fn apply_property(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            DRY_RUN => self.dry_run = bool_property(key, value)?,
            FORCE_ANALYSIS => self.force_analysis = bool_property(key, value)?,
            PROJECT_KEY => self.project_key = Some(value.trim().to_string()),
            PROJECT_NAME => self.project_name = Some(value.trim().to_string()),
            _ => tracing::warn!(property = key, "ignoring unknown property"),
        }
        Ok(())
    }

    /// The flags the lock coordinator reads.
    pub fn run_settings(&self) -> RunSettings {
        RunSettings::new(self.dry_run, self.force_analysis)
    }

    /// The project this config targets; the key is empty when unset.
    pub fn project(&self) -> Project {
        Project::new(
            self.project_key.clone().unwrap_or_default(),
            self.project_name.clone(),
        )
    }
}

fn bool_property(key: &str, value: &str) -> Result<bool> {
    parse_bool(value).ok_or_else(|| {
        ProjlockError::UserError(format!(
            "invalid value '{}' for property '{}': expected true or false",
            value, key
        ))
    })
}
