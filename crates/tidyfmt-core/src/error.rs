//! Error and violation types for the formatting engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

pub type FormatResult<T> = Result<T, FormatError>;

/// A single whitespace/encoding finding for one file.
///
/// Violations are informational records, not errors by themselves. The
/// dispatcher only turns "one or more violations were found" into a failure
/// in aggregate, via [`FormatError::CheckFailed`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub file: PathBuf,
    pub rule: String,
    pub message: String,
}

impl Violation {
    pub fn new(file: PathBuf, rule: &str, message: impl Into<String>) -> Self {
        Self {
            file,
            rule: rule.to_string(),
            message: message.into(),
        }
    }
}

/// Engine errors.
///
/// Expected "found a problem" outcomes (a file needing reformatting in check
/// mode) are carried as [`FormatError::CheckFailed`] so they flow through the
/// same aggregation channel as infrastructure failures, per the callback
/// contract. Only infrastructure failures (I/O, process spawn, bad config)
/// are raised from component-level operations.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("failed to read file: {path}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write file: {path}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("non-ASCII content in {path}, rule requires ascii encoding")]
    NonAsciiContent { path: PathBuf },

    #[error("{tool} exited with {status}")]
    ToolExit { tool: String, status: String },

    #[error("failed to invoke {tool}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("backup already exists: {path} (pass force to overwrite)")]
    BackupConflict { path: PathBuf },

    #[error("{formatter}: {count} file(s) need formatting")]
    CheckFailed {
        formatter: String,
        count: usize,
        violations: Vec<Violation>,
    },

    #[error("unknown formatter: {name}")]
    UnknownFormatter { name: String },

    /// Several independent failures from one file group. Produced by actions
    /// that keep processing a group after a per-file failure.
    #[error("{}", join_errors(.0))]
    Multiple(Vec<FormatError>),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn join_errors(errors: &[FormatError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration loading and validation errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file: {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("rule {index} has an empty extension list")]
    EmptyRuleExtensions { index: usize },

    #[error("rule {index} extension {extension:?} is missing its leading dot")]
    ExtensionMissingDot { index: usize, extension: String },
}
