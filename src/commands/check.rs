use std::process::ExitCode;

use anyhow::Result;
use ferry::application::Resolver;
use ferry::domain::ports::Transport;
use ferry::Config;

/// Resolve each URI and report it. `scp://` destinations are connected to.
pub fn cmd_check(config: &Config, uris: &[String], json: bool) -> Result<ExitCode> {
    let (scp, ssh) = config.programs.launchers();
    let resolver = Resolver::new().with_launchers(scp, ssh);

    let mut invalid = 0usize;
    for uri in uris {
        match resolver.resolve(uri) {
            Ok(transport) => {
                if json {
                    let event = serde_json::json!({
                        "event": "check",
                        "destination": transport.display_name(),
                        "kind": transport.kind(),
                        "valid": true,
                    });
                    println!("{}", serde_json::to_string(&event)?);
                } else {
                    println!("✓ {} ({})", transport.display_name(), transport.kind());
                }
            }
            Err(e) => {
                invalid += 1;
                if json {
                    let event = serde_json::json!({
                        "event": "check",
                        "valid": false,
                        "error": e.to_string(),
                    });
                    println!("{}", serde_json::to_string(&event)?);
                } else {
                    println!("✗ {e}");
                }
            }
        }
    }

    Ok(if invalid == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
