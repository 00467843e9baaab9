//! Session SCP Transport
//!
//! Holds one authenticated libssh2 session for the lifetime of the transport
//! and streams every file over SFTP. The session is established (and
//! authenticated) at construction so a bad host fails fast.

use std::fs::File;
use std::io::{self, Read, Write};
use std::net::TcpStream;
use std::path::{Path, PathBuf};

use ssh2::Session;
use tracing::{debug, info, warn};

use super::ssh_config::SshConfig;
use super::ScpOptions;
use crate::domain::ports::{source_file_name, TransferError, Transport};
use crate::domain::value_objects::{
    remote_join, Destination, Scheme, ScriptTemplate, TransferOutcome,
};
use crate::error::{FerryError, FerryResult, Violation};

/// Upload chunk size
pub const CHUNK_SIZE: usize = 4096;

const DEFAULT_IDENTITIES: [&str; 4] = ["id_rsa", "id_dsa", "id_ecdsa", "id_ed25519"];

/// Where and as whom to connect, after merging URI, SSH config and defaults
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub identity_file: Option<PathBuf>,
}

impl ConnectionParams {
    /// Merge connection settings.
    ///
    /// Username and port: URI, then SSH config, then defaults. The host name
    /// comes from the config's `HostName` when the URI host is an alias.
    pub fn resolve(
        destination: &Destination,
        options: &ScpOptions,
        ssh_config: &SshConfig,
    ) -> FerryResult<Self> {
        let alias = destination.host().ok_or_else(|| {
            destination.reject(vec![Violation::constraint("hostname is required")])
        })?;
        let host_config = ssh_config.lookup(alias);

        let user = match destination
            .username()
            .map(str::to_string)
            .or(host_config.user)
        {
            Some(user) => user,
            None => {
                let user = local_user().ok_or_else(|| {
                    destination.reject(vec![Violation::constraint(
                        "no user in URI or ssh config and the local user name is unknown",
                    )])
                })?;
                info!(user = %user, "using local user name");
                user
            }
        };

        Ok(Self {
            host: host_config.hostname.unwrap_or_else(|| alias.to_string()),
            port: destination
                .port()
                .or(host_config.port)
                .or_else(|| Scheme::Scp.default_port())
                .unwrap_or(22),
            user,
            identity_file: options.private_key.clone().or(host_config.identity_file),
        })
    }
}

fn local_user() -> Option<String> {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|name| !name.trim().is_empty())
}

/// Transport over a persistent SSH session
pub struct SessionScp {
    destination: Destination,
    params: ConnectionParams,
    remote_dir: String,
    script: Option<ScriptTemplate>,
    session: Session,
}

impl SessionScp {
    /// Validate the destination and open an authenticated session using the
    /// user's `~/.ssh/config`.
    pub fn connect(destination: Destination) -> FerryResult<Self> {
        Self::connect_with(destination, &SshConfig::load_user())
    }

    pub fn connect_with(destination: Destination, ssh_config: &SshConfig) -> FerryResult<Self> {
        if destination.scheme() != Scheme::Scp {
            return Err(destination.reject(vec![Violation::constraint(format!(
                "scheme must be 'scp', got '{}'",
                destination.scheme()
            ))]));
        }
        let options = ScpOptions::decode(&destination)?;
        let params = ConnectionParams::resolve(&destination, &options, ssh_config)?;

        let session = open_session(&params, destination.password()).map_err(|message| {
            FerryError::Connection {
                destination: destination.display_name(),
                message,
            }
        })?;
        info!(
            host = %params.host,
            port = params.port,
            user = %params.user,
            "ssh session established"
        );

        Ok(Self {
            remote_dir: destination.path().to_string(),
            script: options.script,
            destination,
            params,
            session,
        })
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    fn upload(&self, source: &Path, remote_file: &str) -> Result<(), TransferError> {
        let sftp = self.session.sftp()?;
        let mut input = File::open(source)?;
        let mut output = sftp.create(Path::new(remote_file))?;
        let written = copy_chunked(&mut input, &mut output)?;
        output.flush()?;
        debug!(remote_file, bytes = written, "uploaded");
        Ok(())
    }

    fn run_script(&self, command: &str) -> Result<TransferOutcome, TransferError> {
        debug!(command, "running remote script");
        let mut channel = self.session.channel_session()?;
        // stderr arrives on the same stream as stdout
        channel.handle_extended_data(ssh2::ExtendedData::Merge)?;
        channel.exec(command)?;

        let mut output = Vec::new();
        channel.read_to_end(&mut output)?;
        channel.wait_close()?;
        let exit_status = channel.exit_status()?;

        Ok(script_outcome(exit_status, &output))
    }
}

/// Copy `input` to `output` in writes of at most [`CHUNK_SIZE`] bytes.
fn copy_chunked<R: Read, W: Write>(input: &mut R, output: &mut W) -> io::Result<u64> {
    let mut chunk = [0u8; CHUNK_SIZE];
    let mut total = 0u64;
    loop {
        let read = match input.read(&mut chunk) {
            Ok(0) => return Ok(total),
            Ok(read) => read,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        output.write_all(&chunk[..read])?;
        total += read as u64;
    }
}

fn script_outcome(exit_status: i32, output: &[u8]) -> TransferOutcome {
    debug!(
        exit_status,
        output = %String::from_utf8_lossy(output),
        "remote script finished"
    );
    if exit_status == 0 {
        TransferOutcome::succeeded().with_status(exit_status)
    } else {
        TransferOutcome::failed(format!("remote script exited with {exit_status}"))
            .with_status(exit_status)
    }
}

impl Transport for SessionScp {
    fn kind(&self) -> &'static str {
        "scp"
    }

    fn display_name(&self) -> String {
        self.destination.display_name()
    }

    fn process_file(&self, source: &Path) -> Result<TransferOutcome, TransferError> {
        let remote_file = remote_join(&self.remote_dir, &source_file_name(source)?);
        self.upload(source, &remote_file)?;
        match &self.script {
            Some(script) => self.run_script(&script.render(&remote_file)),
            None => Ok(TransferOutcome::succeeded()),
        }
    }
}

impl Drop for SessionScp {
    fn drop(&mut self) {
        let _ = self.session.disconnect(None, "ferry closing", None);
    }
}

fn open_session(params: &ConnectionParams, password: Option<&str>) -> Result<Session, String> {
    let tcp = TcpStream::connect((params.host.as_str(), params.port))
        .map_err(|e| format!("TCP connection to {}:{} failed: {e}", params.host, params.port))?;

    let mut session = Session::new().map_err(|e| format!("failed to create SSH session: {e}"))?;
    session.set_tcp_stream(tcp);
    session
        .handshake()
        .map_err(|e| format!("SSH handshake failed: {e}"))?;

    // Unknown host keys are accepted; record what we saw.
    if let Some(hash) = session.host_key_hash(ssh2::HashType::Sha256) {
        let hex: String = hash.iter().map(|b| format!("{b:02x}")).collect();
        debug!(host_key_sha256 = %hex, "remote host key");
    }

    let method = authenticate(&session, params, password)?;
    debug!(method, "authenticated");
    Ok(session)
}

fn authenticate(
    session: &Session,
    params: &ConnectionParams,
    password: Option<&str>,
) -> Result<&'static str, String> {
    let user = params.user.as_str();
    let mut failures: Vec<String> = Vec::new();

    match &params.identity_file {
        Some(key_path) => {
            // Agent first, restricted to the configured key.
            match load_public_key(key_path) {
                Some(wanted) => {
                    if try_agent(session, user, Some(&wanted)) {
                        return Ok("agent");
                    }
                }
                None => debug!(path = %key_path.display(), "cannot read public half of key"),
            }
            match session.userauth_pubkey_file(user, None, key_path, None) {
                Ok(()) if session.authenticated() => return Ok("publickey"),
                Ok(()) => failures.push("publickey: rejected".to_string()),
                Err(e) => failures.push(format!("publickey: {e}")),
            }
        }
        None => {
            if try_agent(session, user, None) {
                return Ok("agent");
            }
            failures.push("agent: no accepted identity".to_string());

            let ssh_dir = dirs::home_dir().map(|home| home.join(".ssh"));
            for key_path in ssh_dir.as_deref().map(default_identities).unwrap_or_default() {
                match session.userauth_pubkey_file(user, None, &key_path, None) {
                    Ok(()) if session.authenticated() => return Ok("publickey"),
                    Ok(()) => failures.push(format!("{}: rejected", key_path.display())),
                    Err(e) => failures.push(format!("{}: {e}", key_path.display())),
                }
            }
        }
    }

    if let Some(password) = password {
        match session.userauth_password(user, password) {
            Ok(()) if session.authenticated() => return Ok("password"),
            Ok(()) => failures.push("password: rejected".to_string()),
            Err(e) => failures.push(format!("password: {e}")),
        }
    }

    warn!(user, "ssh authentication failed");
    Err(format!(
        "authentication failed for user '{user}' ({})",
        failures.join("; ")
    ))
}

/// Private keys OpenSSH tries by default, in its order, that exist in `ssh_dir`
fn default_identities(ssh_dir: &Path) -> Vec<PathBuf> {
    DEFAULT_IDENTITIES
        .iter()
        .map(|name| ssh_dir.join(name))
        .filter(|path| path.is_file())
        .collect()
}

/// Offer agent identities, restricted to `wanted` when given.
fn try_agent(session: &Session, user: &str, wanted: Option<&ssh_key::PublicKey>) -> bool {
    let Ok(mut agent) = session.agent() else {
        return false;
    };
    if agent.connect().is_err() || agent.list_identities().is_err() {
        return false;
    }
    let identities = agent.identities().unwrap_or_default();
    let mut accepted = false;
    for identity in &identities {
        if let Some(wanted) = wanted {
            if !same_key(wanted, identity.blob()) {
                continue;
            }
        }
        if agent.userauth(user, identity).is_ok() && session.authenticated() {
            accepted = true;
            break;
        }
    }
    let _ = agent.disconnect();
    accepted
}

fn load_public_key(private_key: &Path) -> Option<ssh_key::PublicKey> {
    let mut public_path = private_key.as_os_str().to_owned();
    public_path.push(".pub");
    if let Ok(public) = ssh_key::PublicKey::read_openssh_file(Path::new(&public_path)) {
        return Some(public);
    }
    ssh_key::PrivateKey::read_openssh_file(private_key)
        .ok()
        .map(|key| key.public_key().clone())
}

/// Same algorithm and same SHA-256 fingerprint
fn same_key(wanted: &ssh_key::PublicKey, agent_blob: &[u8]) -> bool {
    match ssh_key::PublicKey::from_bytes(agent_blob) {
        Ok(offered) => {
            offered.algorithm() == wanted.algorithm()
                && offered.fingerprint(ssh_key::HashAlg::Sha256)
                    == wanted.fingerprint(ssh_key::HashAlg::Sha256)
        }
        Err(_) => false,
    }
}
