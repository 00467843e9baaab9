//! Minimal OpenSSH client config reader.
//!
//! Only the settings a connection needs are extracted: `HostName`, `User`,
//! `Port` and `IdentityFile`. Like `ssh`, the first value obtained for a key
//! wins, and `Host` patterns support `*`, `?` and `!` negation.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Settings that apply to one host after evaluating every matching block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostConfig {
    pub hostname: Option<String>,
    pub user: Option<String>,
    pub port: Option<u16>,
    pub identity_file: Option<PathBuf>,
}

#[derive(Debug, Clone)]
struct Block {
    patterns: Vec<String>,
    settings: Vec<(String, String)>,
}

/// Parsed `~/.ssh/config`
#[derive(Debug, Clone, Default)]
pub struct SshConfig {
    blocks: Vec<Block>,
}

impl SshConfig {
    /// Load the user's config, or an empty one if it is absent or unreadable
    pub fn load_user() -> Self {
        let Some(path) = dirs::home_dir().map(|home| home.join(".ssh").join("config")) else {
            return Self::default();
        };
        Self::load(&path)
    }

    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => Self::parse(&content),
            Err(e) => {
                debug!(path = %path.display(), error = %e, "no ssh config");
                Self::default()
            }
        }
    }

    pub fn parse(content: &str) -> Self {
        // Settings before the first Host line apply to every host.
        let mut blocks = vec![Block {
            patterns: vec!["*".to_string()],
            settings: Vec::new(),
        }];

        for raw in content.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = split_setting(line) else {
                continue;
            };
            let key = key.to_ascii_lowercase();
            if key == "host" {
                blocks.push(Block {
                    patterns: value.split_whitespace().map(str::to_string).collect(),
                    settings: Vec::new(),
                });
            } else if key == "match" {
                // Match blocks are not evaluated; park their settings where
                // nothing will see them.
                blocks.push(Block {
                    patterns: Vec::new(),
                    settings: Vec::new(),
                });
            } else if let Some(block) = blocks.last_mut() {
                block.settings.push((key, unquote(value).to_string()));
            }
        }

        Self { blocks }
    }

    /// Resolve the settings that apply to `alias`
    pub fn lookup(&self, alias: &str) -> HostConfig {
        let mut config = HostConfig::default();
        let mut port_seen = false;
        for block in self.blocks.iter().filter(|b| host_matches(&b.patterns, alias)) {
            for (key, value) in &block.settings {
                match key.as_str() {
                    "hostname" if config.hostname.is_none() => {
                        config.hostname = Some(value.replace("%h", alias));
                    }
                    "user" if config.user.is_none() => config.user = Some(value.clone()),
                    "port" if !port_seen => {
                        port_seen = true;
                        config.port = value.parse().ok();
                        if config.port.is_none() {
                            debug!(alias, port = %value, "ignoring unparsable Port");
                        }
                    }
                    "identityfile" if config.identity_file.is_none() => {
                        config.identity_file = Some(expand_tilde(value));
                    }
                    _ => {}
                }
            }
        }
        config
    }
}

fn split_setting(line: &str) -> Option<(&str, &str)> {
    let idx = line.find(|c: char| c.is_whitespace() || c == '=')?;
    let (key, rest) = line.split_at(idx);
    let value = rest
        .trim_start()
        .strip_prefix('=')
        .unwrap_or(rest)
        .trim();
    if value.is_empty() {
        None
    } else {
        Some((key, value))
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn expand_tilde(value: &str) -> PathBuf {
    match value.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(value)),
        None => PathBuf::from(value),
    }
}

fn host_matches(patterns: &[String], alias: &str) -> bool {
    let mut matched = false;
    for pattern in patterns {
        if let Some(negated) = pattern.strip_prefix('!') {
            if wildcard_match(negated, alias) {
                return false;
            }
        } else if wildcard_match(pattern, alias) {
            matched = true;
        }
    }
    matched
}

/// Glob match supporting `*` and `?`
fn wildcard_match(pattern: &str, name: &str) -> bool {
    let p = pattern.as_bytes();
    let s = name.as_bytes();
    let (mut pi, mut si) = (0usize, 0usize);
    let mut star: Option<usize> = None;
    let mut mark = 0usize;
    while si < s.len() {
        if pi < p.len() && (p[pi] == b'?' || p[pi].eq_ignore_ascii_case(&s[si])) {
            pi += 1;
            si += 1;
        } else if pi < p.len() && p[pi] == b'*' {
            star = Some(pi);
            pi += 1;
            mark = si;
        } else if let Some(star_at) = star {
            pi = star_at + 1;
            mark += 1;
            si = mark;
        } else {
            return false;
        }
    }
    while pi < p.len() && p[pi] == b'*' {
        pi += 1;
    }
    pi == p.len()
}
