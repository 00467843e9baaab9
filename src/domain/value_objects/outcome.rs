//! Transfer outcome - the result of one transfer attempt.

use std::fmt;

/// Result of pushing one file to one destination.
///
/// Created per call and never persisted. `status` is transport specific:
/// the HTTP status code or an external process exit code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferOutcome {
    pub success: bool,
    pub status: Option<i64>,
    pub message: Option<String>,
}

impl TransferOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            status: None,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            status: None,
            message: Some(message.into()),
        }
    }

    pub fn with_status(mut self, status: impl Into<i64>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl fmt::Display for TransferOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.success { "ok" } else { "failed" })?;
        if let Some(status) = self.status {
            write!(f, " (status {status})")?;
        }
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        Ok(())
    }
}
