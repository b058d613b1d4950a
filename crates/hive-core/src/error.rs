//! Error types for hive operations.
//!
//! Steady-state swarm operations do not fail: unknown ids, empty fields and
//! exhausted bees degrade to no-ops or empty results. Errors only surface at
//! the edges, when validating configuration or parsing user input.

use thiserror::Error;

/// Result type for hive operations.
pub type Result<T> = std::result::Result<T, HiveError>;

/// Errors that can occur at the edges of the swarm.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HiveError {
    /// A configuration value is out of range.
    #[error("invalid config value for {field}: {reason}")]
    Config { field: String, reason: String },

    /// A role name did not parse.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// A mood name did not parse.
    #[error("unknown mood: {0}")]
    UnknownMood(String),
}

impl HiveError {
    pub fn config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        HiveError::Config {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
