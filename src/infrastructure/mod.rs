//! Infrastructure Layer
//!
//! Concrete I/O: transports and the process lock file.

pub mod lock;
pub mod transport;

pub use lock::{install_interrupt_cleanup, probe as probe_lock, LockState, ProcessLock};
pub use transport::{
    ConnectionParams, HostConfig, HttpUpload, Launcher, LocalCopy, LocalOptions, ProcessScp,
    ScpOptions, SessionScp, SshConfig,
};
