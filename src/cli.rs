use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Ferry - copy files to local, SCP and HTTP backup destinations
#[derive(Parser, Debug)]
#[command(name = "ferry")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format for CI
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file (default: ./ferry.toml, then ~/.config/ferry/config.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy files to every destination
    Push {
        /// Destination URI (repeatable; defaults to `destinations` from config)
        #[arg(long = "to", value_name = "URI")]
        to: Vec<String>,

        /// Hold this lock file while pushing
        #[arg(long, value_name = "FILE")]
        lock: Option<PathBuf>,

        /// Push to destinations concurrently
        #[arg(long)]
        parallel: bool,

        /// Files to copy
        #[arg(required = true, value_name = "FILE")]
        files: Vec<PathBuf>,
    },

    /// Validate destination URIs without transferring anything
    Check {
        /// Destination URIs
        #[arg(required = true, value_name = "URI")]
        uris: Vec<String>,
    },

    /// Report whether a lock file is held by a running process
    LockStatus {
        /// Lock file path
        #[arg(value_name = "FILE")]
        path: PathBuf,
    },
}
