//! Ferry CLI - copy files to URL-addressed backup destinations
//!
//! Usage: ferry <COMMAND>
//!
//! Commands:
//!   push         Copy files to every destination
//!   check        Validate destination URIs
//!   lock-status  Report whether a lock file is held

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use ferry::logging::{init_logging, LogConfig};

use cli::{Cli, Commands};
use commands::push::PushArgs;

/// Exit status when setup fails before any transfer
const SETUP_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let (config, warnings) = match commands::load_config(cli.config.as_deref()) {
        Ok(loaded) => loaded,
        Err(e) => {
            init_logging(LogConfig {
                verbose: cli.verbose,
                config_filter: None,
            });
            eprintln!("Error: {e:#}");
            return ExitCode::from(SETUP_FAILURE);
        }
    };

    init_logging(LogConfig {
        verbose: cli.verbose,
        config_filter: config.log_filter.as_deref(),
    });
    commands::report_config_warnings(&warnings);

    let result = match cli.command {
        Commands::Push {
            to,
            lock,
            parallel,
            files,
        } => commands::push::cmd_push(
            &config,
            PushArgs {
                to,
                lock,
                parallel,
                files,
            },
            cli.json,
        ),
        Commands::Check { uris } => commands::check::cmd_check(&config, &uris, cli.json),
        Commands::LockStatus { path } => commands::lock_status::cmd_lock_status(&path, cli.json),
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(SETUP_FAILURE)
        }
    }
}
