//! Configuration module for Ferry
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (FERRY_*)
//! 3. Project config (./ferry.toml)
//! 4. User config (~/.config/ferry/config.toml)
//! 5. Built-in defaults (lowest priority)

mod loader;
#[cfg(test)]
mod tests;
mod types;

pub use loader::{find_config, with_env_overrides, ConfigWarning, PROJECT_CONFIG};
pub use types::{Config, ProgramsConfig};
