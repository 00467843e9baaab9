//! Process SCP Transport
//!
//! Delegates every remote operation to the system `scp` and `ssh` clients.
//! Each transfer runs two phases:
//! 1. `send_file`: `scp` the file into the remote directory
//! 2. `run_script`: `ssh` the configured script, only if phase 1 succeeded
//!
//! Both run in batch mode with stdin closed so no prompt can block.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::{Command, Output, Stdio};

use tracing::debug;

use super::ScpOptions;
use crate::domain::ports::{source_file_name, TransferError, Transport};
use crate::domain::value_objects::{
    remote_join, Destination, Scheme, ScriptTemplate, TransferOutcome,
};
use crate::error::{FerryResult, Violation};

/// An executable plus any arguments that always precede ours
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Launcher {
    program: OsString,
    leading: Vec<OsString>,
}

impl Launcher {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            leading: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.leading.push(arg.into());
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.leading);
        cmd
    }
}

/// Transport that shells out to `scp` and `ssh`
#[derive(Debug, Clone)]
pub struct ProcessScp {
    destination: Destination,
    host: String,
    port: u16,
    user: Option<String>,
    remote_dir: String,
    private_key: Option<std::path::PathBuf>,
    script: Option<ScriptTemplate>,
    scp: Launcher,
    ssh: Launcher,
}

impl ProcessScp {
    pub fn new(destination: Destination) -> FerryResult<Self> {
        if destination.scheme() != Scheme::Cscp {
            return Err(destination.reject(vec![Violation::constraint(format!(
                "scheme must be 'cscp', got '{}'",
                destination.scheme()
            ))]));
        }
        let options = ScpOptions::decode(&destination)?;
        let host = destination
            .host()
            .map(str::to_string)
            .ok_or_else(|| destination.reject(vec![Violation::constraint("hostname is required")]))?;

        Ok(Self {
            host,
            port: destination.port_or_default().unwrap_or(22),
            user: destination.username().map(str::to_string),
            remote_dir: destination.path().to_string(),
            private_key: options.private_key,
            script: options.script,
            scp: Launcher::new("scp"),
            ssh: Launcher::new("ssh"),
            destination,
        })
    }

    /// Replace the `scp` and `ssh` executables
    pub fn with_launchers(mut self, scp: Launcher, ssh: Launcher) -> Self {
        self.scp = scp;
        self.ssh = ssh;
        self
    }

    fn target(&self) -> String {
        match &self.user {
            Some(user) => format!("{user}@{}", self.host),
            None => self.host.clone(),
        }
    }

    /// `target` for scp's `host:path` operand; IPv6 literals keep their brackets
    fn scp_target(&self) -> String {
        let host = if self.host.contains(':') {
            format!("[{}]", self.host)
        } else {
            self.host.clone()
        };
        match &self.user {
            Some(user) => format!("{user}@{host}"),
            None => host,
        }
    }

    fn identity_args(&self) -> Vec<OsString> {
        match &self.private_key {
            Some(key) => vec!["-i".into(), key.as_os_str().to_owned()],
            None => Vec::new(),
        }
    }

    /// Arguments for phase 1
    pub fn scp_args(&self, source: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-B".into(), "-P".into(), self.port.to_string().into()];
        args.extend(self.identity_args());
        args.push(source.as_os_str().to_owned());
        args.push(format!("{}:{}", self.scp_target(), self.remote_dir).into());
        args
    }

    /// Arguments for phase 2
    pub fn ssh_args(&self, command: &str) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-o".into(),
            "BatchMode=yes".into(),
            "-p".into(),
            self.port.to_string().into(),
        ];
        args.extend(self.identity_args());
        args.push(self.target().into());
        args.push(command.into());
        args
    }

    /// Phase 1: copy the file to the remote directory
    pub fn send_file(&self, source: &Path) -> Result<TransferOutcome, TransferError> {
        let mut cmd = self.scp.command();
        cmd.args(self.scp_args(source));
        run_phase("scp", &self.scp, cmd)
    }

    /// Phase 2: run the configured script, trivially successful without one
    pub fn run_script(&self, source: &Path) -> Result<TransferOutcome, TransferError> {
        let Some(script) = &self.script else {
            return Ok(TransferOutcome::succeeded());
        };
        let remote_file = remote_join(&self.remote_dir, &source_file_name(source)?);
        let mut cmd = self.ssh.command();
        cmd.args(self.ssh_args(&script.render(&remote_file)));
        run_phase("script", &self.ssh, cmd)
    }
}

impl Transport for ProcessScp {
    fn kind(&self) -> &'static str {
        "cscp"
    }

    fn display_name(&self) -> String {
        self.destination.display_name()
    }

    fn process_file(&self, source: &Path) -> Result<TransferOutcome, TransferError> {
        source_file_name(source)?;
        let sent = self.send_file(source)?;
        if !sent.is_success() {
            return Ok(sent);
        }
        self.run_script(source)
    }
}

fn run_phase(
    phase: &str,
    launcher: &Launcher,
    mut cmd: Command,
) -> Result<TransferOutcome, TransferError> {
    debug!(phase, command = ?cmd, "running");
    let output = cmd
        .stdin(Stdio::null())
        .output()
        .map_err(|source| TransferError::Launch {
            program: launcher.program().to_string_lossy().into_owned(),
            source,
        })?;
    debug!(
        phase,
        status = %output.status,
        stdout = %String::from_utf8_lossy(&output.stdout),
        stderr = %String::from_utf8_lossy(&output.stderr),
        "finished"
    );

    let outcome = if output.status.success() {
        TransferOutcome::succeeded()
    } else {
        TransferOutcome::failed(format!("{phase} failed: {}", command_summary(&output)))
    };
    Ok(match output.status.code() {
        Some(code) => outcome.with_status(code),
        None => outcome,
    })
}

fn command_summary(out: &Output) -> String {
    let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    let stdout = String::from_utf8_lossy(&out.stdout).trim().to_string();
    if !stdout.is_empty() {
        return stdout;
    }
    format!("{}", out.status)
}
