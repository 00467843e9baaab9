//! Configuration type definitions

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::FerryResult;
use crate::infrastructure::Launcher;

use super::loader::{self, ConfigWarning};

/// External programs used by `cscp://` destinations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramsConfig {
    #[serde(default = "default_scp")]
    pub scp: String,

    #[serde(default = "default_ssh")]
    pub ssh: String,
}

impl Default for ProgramsConfig {
    fn default() -> Self {
        Self {
            scp: default_scp(),
            ssh: default_ssh(),
        }
    }
}

impl ProgramsConfig {
    pub fn launchers(&self) -> (Launcher, Launcher) {
        (Launcher::new(&self.scp), Launcher::new(&self.ssh))
    }
}

fn default_scp() -> String {
    "scp".to_string()
}

fn default_ssh() -> String {
    "ssh".to_string()
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Destinations used by `push` when none are given on the command line
    #[serde(default)]
    pub destinations: Vec<String>,

    /// Lock file held for the duration of `push`
    #[serde(default)]
    pub lock_file: Option<PathBuf>,

    /// `tracing` filter directive, e.g. `ferry=debug`
    #[serde(default)]
    pub log_filter: Option<String>,

    /// Push to destinations concurrently
    #[serde(default)]
    pub parallel: bool,

    #[serde(default)]
    pub programs: ProgramsConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> FerryResult<Self> {
        Ok(loader::load_with_warnings(path)?.0)
    }

    /// Load configuration and report unknown keys as warnings
    pub fn load_with_warnings(path: &Path) -> FerryResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }
}
