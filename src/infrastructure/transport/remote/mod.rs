//! Remote SCP Transports
//!
//! Two ways to reach an SSH host with identical observable behaviour:
//! - `SessionScp` (`scp://`): one persistent in-process session via libssh2
//! - `ProcessScp` (`cscp://`): external `scp`/`ssh` processes per transfer
//!
//! Both accept the same query options, decoded by [`ScpOptions`].

mod process;
mod session;
mod ssh_config;

pub use process::{Launcher, ProcessScp};
pub use session::{ConnectionParams, SessionScp};
pub use ssh_config::{HostConfig, SshConfig};

use std::path::PathBuf;

use crate::domain::value_objects::{Destination, ScriptTemplate};
use crate::error::FerryResult;

/// Options understood by `scp://` and `cscp://` destinations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScpOptions {
    /// Identity file used for public-key authentication
    pub private_key: Option<PathBuf>,
    /// Command run on the remote host after a successful upload
    pub script: Option<ScriptTemplate>,
}

impl ScpOptions {
    pub fn decode(destination: &Destination) -> FerryResult<Self> {
        let mut decoder = destination.options().decoder();
        let private_key = decoder.single_non_empty("private_key").map(PathBuf::from);
        let script = decoder.single_non_empty("script").map(ScriptTemplate::new);
        decoder
            .finish()
            .map_err(|violations| destination.reject(violations))?;
        Ok(Self {
            private_key,
            script,
        })
    }
}
