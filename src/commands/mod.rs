pub mod check;
pub mod lock_status;
pub mod push;

use std::path::Path;

use anyhow::Result;
use ferry::config::{find_config, with_env_overrides, Config, ConfigWarning};

/// Load `explicit`, else the first config found, else defaults.
///
/// A config file that exists but fails to parse is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<(Config, Vec<ConfigWarning>)> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => find_config(),
    };
    let (config, warnings) = match path {
        Some(path) => Config::load_with_warnings(&path)?,
        None => (Config::default(), Vec::new()),
    };
    Ok((with_env_overrides(config), warnings))
}

pub fn report_config_warnings(warnings: &[ConfigWarning]) {
    for warning in warnings {
        let line = warning
            .line
            .map(|l| format!(":{l}"))
            .unwrap_or_default();
        match &warning.suggestion {
            Some(suggestion) => tracing::warn!(
                "unknown config key '{}' in {}{} (did you mean '{}'?)",
                warning.key,
                warning.file.display(),
                line,
                suggestion
            ),
            None => tracing::warn!(
                "unknown config key '{}' in {}{}",
                warning.key,
                warning.file.display(),
                line
            ),
        }
    }
}
