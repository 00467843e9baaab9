use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use ferry::application::{push_files, BackupHandler, PushOptions, PushReport, Resolver};
use ferry::infrastructure::{install_interrupt_cleanup, ProcessLock};
use ferry::Config;

pub struct PushArgs {
    pub to: Vec<String>,
    pub lock: Option<PathBuf>,
    pub parallel: bool,
    pub files: Vec<PathBuf>,
}

pub fn cmd_push(config: &Config, args: PushArgs, json: bool) -> Result<ExitCode> {
    let uris = if args.to.is_empty() {
        config.destinations.clone()
    } else {
        args.to
    };
    if uris.is_empty() {
        bail!("no destinations: pass --to URI or set `destinations` in ferry.toml");
    }

    // Held until this function returns
    let _lock = match args.lock.or_else(|| config.lock_file.clone()) {
        Some(path) => {
            let lock = ProcessLock::acquire(&path)?;
            install_interrupt_cleanup(&path)?;
            Some(lock)
        }
        None => None,
    };

    let (scp, ssh) = config.programs.launchers();
    let resolver = Resolver::new().with_launchers(scp, ssh);
    let mut handlers = Vec::with_capacity(uris.len());
    for uri in &uris {
        let transport = resolver
            .resolve(uri)
            .with_context(|| "cannot set up destination")?;
        handlers.push(BackupHandler::new(transport));
    }

    let options = PushOptions {
        parallel: args.parallel || config.parallel,
    };
    let report = push_files(&mut handlers, &args.files, options);

    if json {
        print_json(&report)?;
    } else {
        print_human(&report);
    }

    Ok(if report.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn print_json(report: &PushReport) -> Result<()> {
    for entry in &report.entries {
        let event = serde_json::json!({
            "event": "transfer",
            "destination": entry.destination,
            "file": entry.file.display().to_string(),
            "success": entry.outcome.success,
            "status": entry.outcome.status,
            "message": entry.outcome.message,
        });
        println!("{}", serde_json::to_string(&event)?);
    }
    let summary = serde_json::json!({
        "event": "complete",
        "succeeded": report.succeeded_count(),
        "failed": report.entries.len() - report.succeeded_count(),
    });
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

fn print_human(report: &PushReport) {
    for entry in &report.entries {
        let mark = if entry.outcome.success { "✓" } else { "✗" };
        println!(
            "{mark} {} -> {}: {}",
            entry.file.display(),
            entry.destination,
            entry.outcome
        );
    }
    let failed = report.entries.len() - report.succeeded_count();
    if failed > 0 {
        println!("{} succeeded, {failed} failed", report.succeeded_count());
    }
}
