//! Error types for the harness
//!
//! Stage-level failures carry the exact failing command or field so that a
//! regression report names what to look at first.

use std::io;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the harness
#[derive(Error, Debug)]
pub enum Error {
    // === Stage Execution Errors ===
    #[error("failed during: {command} (exit code {exit_code})")]
    StageCommandFailed { command: String, exit_code: i32 },

    #[error("failed to spawn: {command}: {error}")]
    StageSpawnFailed { command: String, error: String },

    #[error("timed out after {seconds}s during: {command}")]
    StageTimeout { command: String, seconds: u64 },

    #[error("missing expected artifact: {path}")]
    MissingArtifact { path: String },

    // === Validation Errors ===
    #[error("{0}")]
    Expectation(String),

    #[error("malformed probe response: {0}")]
    ProbeMalformed(String),

    // === Scenario/Configuration Errors ===
    #[error("scenario error: {0}")]
    Scenario(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid configuration file: {0}")]
    ConfigParse(String),

    // === Aggregate Result ===
    #[error("{failed} of {total} scenarios failed")]
    ScenariosFailed { failed: usize, total: usize },

    // === IO Errors ===
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an expectation failure with a field/expected/observed diagnostic
    pub fn mismatch(
        field: &str,
        expected: impl std::fmt::Display,
        observed: impl std::fmt::Display,
    ) -> Self {
        Self::Expectation(format!(
            "{field} mismatch: expected {expected}, got {observed}"
        ))
    }

    /// Create an expectation failure for a marker that never appeared
    pub fn absent(field: &str) -> Self {
        Self::Expectation(format!("{field} absent from output"))
    }

    /// Create a file read error
    pub fn file_read(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }
}
