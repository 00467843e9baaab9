//! Tests for the config module

use super::types::*;
use crate::error::FerryError;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_config_default() {
    let config = Config::default();

    assert!(config.destinations.is_empty());
    assert_eq!(config.lock_file, None);
    assert!(!config.parallel);
    assert_eq!(config.programs.scp, "scp");
    assert_eq!(config.programs.ssh, "ssh");
}

#[test]
fn test_config_parse_toml() {
    let toml = r#"
destinations = ["file:///var/backups/logger?create=true", "http://dup:9999/enqueue"]
lock_file = "/run/ferry.pid"
log_filter = "ferry=debug"
parallel = true

[programs]
scp = "/usr/local/bin/scp"
"#;

    let config: Config = toml::from_str(toml).unwrap();

    assert_eq!(config.destinations.len(), 2);
    assert_eq!(config.lock_file, Some(PathBuf::from("/run/ferry.pid")));
    assert_eq!(config.log_filter.as_deref(), Some("ferry=debug"));
    assert!(config.parallel);
    assert_eq!(config.programs.scp, "/usr/local/bin/scp");
    assert_eq!(config.programs.ssh, "ssh");
}

#[test]
fn test_load_with_warnings_reports_unknown_keys() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ferry.toml");
    fs::write(&path, "destinations = []\nlock_fle = \"/tmp/x\"\n").unwrap();

    let (config, warnings) = Config::load_with_warnings(&path).unwrap();

    assert!(config.destinations.is_empty());
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].key, "lock_fle");
    assert_eq!(warnings[0].line, Some(2));
    assert_eq!(warnings[0].suggestion.as_deref(), Some("lock_file"));
}

#[test]
fn test_load_invalid_toml_is_config_file_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ferry.toml");
    fs::write(&path, "destinations = [").unwrap();

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, FerryError::ConfigFile { .. }), "{err}");
}

#[test]
fn test_load_missing_file_is_config_file_error() {
    let dir = tempdir().unwrap();
    let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, FerryError::ConfigFile { .. }), "{err}");
}

#[test]
fn test_programs_launchers() {
    let programs = ProgramsConfig {
        scp: "/opt/scp".to_string(),
        ssh: "/opt/ssh".to_string(),
    };
    let (scp, ssh) = programs.launchers();
    assert_eq!(scp.program(), "/opt/scp");
    assert_eq!(ssh.program(), "/opt/ssh");
}
