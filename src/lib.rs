//! Ferry - URL-addressed file replication
//!
//! A destination URI (`file://`, `scp://`, `cscp://`, `http://`, `https://`)
//! is resolved into a transport, and a [`BackupHandler`] wraps the transport
//! so that replicating one file reports a plain success flag and never
//! propagates a failure to the caller.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod logging;

// Re-exports for convenience
pub use application::{
    push_files, resolve, AnyTransport, BackupHandler, PushEntry, PushOptions, PushReport, Resolver,
};
pub use config::{Config, ConfigWarning};
pub use domain::ports::{TransferError, Transport};
pub use domain::value_objects::{Destination, Scheme, TransferOutcome};
pub use error::{FerryError, FerryResult, Violation};
pub use infrastructure::{HttpUpload, LocalCopy, ProcessLock, ProcessScp, SessionScp};
