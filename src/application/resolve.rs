//! Handler Factory
//!
//! Maps a destination URI to the transport for its scheme. Construction is
//! where all validation happens: a transport returned from here is ready for
//! `process_file` calls until it is dropped.

use std::path::Path;

use crate::domain::ports::{TransferError, Transport};
use crate::domain::value_objects::{Destination, Scheme, TransferOutcome};
use crate::error::FerryResult;
use crate::infrastructure::transport::{
    HttpUpload, Launcher, LocalCopy, ProcessScp, SessionScp, SshConfig,
};

/// The closed set of transports, one variant per supported scheme
pub enum AnyTransport {
    Local(LocalCopy),
    SessionScp(SessionScp),
    ProcessScp(ProcessScp),
    Http(HttpUpload),
}

impl AnyTransport {
    fn as_dyn(&self) -> &dyn Transport {
        match self {
            AnyTransport::Local(t) => t,
            AnyTransport::SessionScp(t) => t,
            AnyTransport::ProcessScp(t) => t,
            AnyTransport::Http(t) => t,
        }
    }
}

impl Transport for AnyTransport {
    fn kind(&self) -> &'static str {
        self.as_dyn().kind()
    }

    fn display_name(&self) -> String {
        self.as_dyn().display_name()
    }

    fn process_file(&self, source: &Path) -> Result<TransferOutcome, TransferError> {
        self.as_dyn().process_file(source)
    }
}

impl std::fmt::Debug for AnyTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple(self.kind()).field(&self.display_name()).finish()
    }
}

/// Builds transports, carrying the environment they depend on
#[derive(Debug, Clone)]
pub struct Resolver {
    scp: Launcher,
    ssh: Launcher,
    ssh_config: Option<SshConfig>,
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            scp: Launcher::new("scp"),
            ssh: Launcher::new("ssh"),
            ssh_config: None,
        }
    }
}

impl Resolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Executables used by `cscp://` destinations
    pub fn with_launchers(mut self, scp: Launcher, ssh: Launcher) -> Self {
        self.scp = scp;
        self.ssh = ssh;
        self
    }

    /// SSH client config for `scp://` destinations (default: `~/.ssh/config`)
    pub fn with_ssh_config(mut self, ssh_config: SshConfig) -> Self {
        self.ssh_config = Some(ssh_config);
        self
    }

    /// Parse `uri` and construct the matching transport.
    pub fn resolve(&self, uri: &str) -> FerryResult<AnyTransport> {
        self.build(Destination::parse(uri)?)
    }

    pub fn build(&self, destination: Destination) -> FerryResult<AnyTransport> {
        let transport = match destination.scheme() {
            Scheme::File => AnyTransport::Local(LocalCopy::new(destination)?),
            Scheme::Http | Scheme::Https => AnyTransport::Http(HttpUpload::new(destination)?),
            Scheme::Cscp => AnyTransport::ProcessScp(
                ProcessScp::new(destination)?
                    .with_launchers(self.scp.clone(), self.ssh.clone()),
            ),
            Scheme::Scp => {
                let session = match &self.ssh_config {
                    Some(config) => SessionScp::connect_with(destination, config)?,
                    None => SessionScp::connect(destination)?,
                };
                AnyTransport::SessionScp(session)
            }
        };
        Ok(transport)
    }
}

/// Resolve `uri` with default settings.
pub fn resolve(uri: &str) -> FerryResult<AnyTransport> {
    Resolver::default().resolve(uri)
}
