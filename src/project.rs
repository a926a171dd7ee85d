//! The project a run targets.

use std::fmt;

/// Identifier and display name of the project under analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// Key identifying the project; lock keys are derived from it.
    pub key: String,

    /// Human-facing name used in diagnostics.
    pub name: String,
}

impl Project {
    /// Create a project; a missing or blank name falls back to the key.
    pub fn new(key: impl Into<String>, name: Option<String>) -> Self {
        let key = key.into();
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| key.clone());
        Self { key, name }
    }

    /// Whether the key is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.key.trim().is_empty()
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.name == self.key {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{} ({})", self.name, self.key)
        }
    }
}
