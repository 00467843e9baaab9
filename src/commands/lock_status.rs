use std::path::Path;
use std::process::ExitCode;

use anyhow::Result;
use ferry::infrastructure::{probe_lock, LockState};

pub fn cmd_lock_status(path: &Path, json: bool) -> Result<ExitCode> {
    let state = probe_lock(path)?;
    let label = match state {
        LockState::Missing => "missing",
        LockState::Unlocked => "stale",
        LockState::Locked => "locked",
    };

    if json {
        let event = serde_json::json!({
            "event": "lock_status",
            "path": path.display().to_string(),
            "state": label,
        });
        println!("{}", serde_json::to_string(&event)?);
    } else {
        eprintln!("{}: {label}", path.display());
    }

    Ok(if state == LockState::Locked {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
