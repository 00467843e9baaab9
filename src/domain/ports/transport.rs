//! Transport Port
//!
//! One strategy for copying a single local file to a destination. The
//! application layer only ever talks to transports through this trait.

use std::path::Path;

use thiserror::Error;

use crate::domain::value_objects::TransferOutcome;

/// Fault raised inside a single transfer call
#[derive(Error, Debug)]
pub enum TransferError {
    /// Source file has no usable file name
    #[error("source '{0}' has no file name")]
    NoFileName(String),

    /// Local or remote file I/O
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// SSH session, SFTP or channel failure
    #[error("SSH error: {0}")]
    Ssh(#[from] ssh2::Error),

    /// HTTP request or transport failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// External program could not be started
    #[error("failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
}

/// Copy one file to a destination and report the outcome.
///
/// Implementations are constructed (and validated) once, then called once per
/// file. Calls on the same instance are not expected to run concurrently.
pub trait Transport: Send {
    /// Short name of the strategy (for logging)
    fn kind(&self) -> &'static str;

    /// Destination identity, safe to log
    fn display_name(&self) -> String;

    /// Transfer `source` into the destination.
    ///
    /// `Ok` with an unsuccessful outcome means the transport ran to completion
    /// but the destination refused or a post-transfer step failed.
    fn process_file(&self, source: &Path) -> Result<TransferOutcome, TransferError>;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn kind(&self) -> &'static str {
        (**self).kind()
    }

    fn display_name(&self) -> String {
        (**self).display_name()
    }

    fn process_file(&self, source: &Path) -> Result<TransferOutcome, TransferError> {
        (**self).process_file(source)
    }
}

/// Base name of `source` as UTF-8, used as the remote file name
pub fn source_file_name(source: &Path) -> Result<String, TransferError> {
    source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| TransferError::NoFileName(source.display().to_string()))
}
