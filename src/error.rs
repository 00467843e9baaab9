//! Error types for Ferry
//!
//! Construction-time failures (bad destinations, unreachable hosts, lock
//! contention) are `FerryError`. Per-transfer faults live in
//! [`crate::domain::ports::TransferError`] and never escape a handler.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for Ferry operations
pub type FerryResult<T> = Result<T, FerryError>;

/// A single reason a destination was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Query keys the scheme does not recognise, all of them at once
    #[error("unknown option(s): {}", .0.join(", "))]
    UnknownOptions(Vec<String>),

    /// A single-valued option supplied more than once
    #[error("option '{key}' given {count} times, expected once")]
    RepeatedOption { key: String, count: usize },

    /// A recognised option with an unusable value
    #[error("option '{key}' is malformed: {reason}")]
    MalformedOption { key: String, reason: String },

    /// Any other constraint on the destination itself
    #[error("{0}")]
    Constraint(String),
}

impl Violation {
    pub fn constraint(message: impl Into<String>) -> Self {
        Self::Constraint(message.into())
    }
}

/// Main error type for Ferry operations
#[derive(Error, Debug)]
pub enum FerryError {
    /// Destination URI or its options failed validation
    #[error("invalid destination '{destination}': {}", join_violations(.violations))]
    Configuration {
        destination: String,
        violations: Vec<Violation>,
    },

    /// No transport is registered for the scheme
    #[error("unsupported scheme '{scheme}'")]
    UnsupportedScheme { scheme: String },

    /// A session-based transport could not connect or authenticate
    #[error("cannot connect to '{destination}': {message}")]
    Connection {
        destination: String,
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be read or parsed
    #[error("invalid config file {file}: {message}")]
    ConfigFile { file: PathBuf, message: String },

    /// Another process holds the lock file
    #[error("lock file {path} is held by another process")]
    Locked { path: PathBuf },

    /// Lock file could not be created or locked
    #[error("cannot lock {path}: {message}")]
    Lock { path: PathBuf, message: String },
}

impl FerryError {
    pub(crate) fn configuration(destination: impl Into<String>, violation: Violation) -> Self {
        Self::Configuration {
            destination: destination.into(),
            violations: vec![violation],
        }
    }

    /// Whether this error was raised while validating a destination
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Configuration { .. } | Self::UnsupportedScheme { .. }
        )
    }
}

fn join_violations(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
