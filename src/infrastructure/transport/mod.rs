//! Transport Implementations
//!
//! Concrete implementations of the `Transport` port:
//! - LocalCopy: `file://` directory copy
//! - SessionScp: `scp://` over a persistent SSH session
//! - ProcessScp: `cscp://` via external `scp`/`ssh`
//! - HttpUpload: `http(s)://` multipart POST

mod http;
mod local;
pub mod remote;

pub use http::HttpUpload;
pub use local::{LocalCopy, LocalOptions};
pub use remote::{
    ConnectionParams, HostConfig, Launcher, ProcessScp, ScpOptions, SessionScp, SshConfig,
};
