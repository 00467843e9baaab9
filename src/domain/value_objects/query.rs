//! Query options - the decoded query string of a destination URI.
//!
//! A key may legally repeat in a query string, so every key maps to a list of
//! values. Transports decode the options they understand through an
//! [`OptionDecoder`], which collects every violation before failing.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::Violation;

/// Multi-valued key/value options in query-string order per key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    entries: BTreeMap<String, Vec<String>>,
}

impl QueryOptions {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut entries: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in pairs {
            entries.entry(key.into()).or_default().push(value.into());
        }
        Self { entries }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// All values supplied for `key`, empty when absent
    pub fn get_all(&self, key: &str) -> &[String] {
        self.entries.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Start a strict decode against this option set
    pub fn decoder(&self) -> OptionDecoder<'_> {
        OptionDecoder {
            options: self,
            recognised: BTreeSet::new(),
            violations: Vec::new(),
        }
    }
}

/// Strict decoder: every key must be claimed by the transport, and every
/// problem is reported together when the decode finishes.
pub struct OptionDecoder<'a> {
    options: &'a QueryOptions,
    recognised: BTreeSet<&'a str>,
    violations: Vec<Violation>,
}

impl<'a> OptionDecoder<'a> {
    /// Claim a single-valued key. Returns `None` when absent or repeated.
    pub fn single(&mut self, key: &'a str) -> Option<&'a str> {
        self.recognised.insert(key);
        match self.options.get_all(key) {
            [] => None,
            [value] => Some(value.as_str()),
            values => {
                self.violations.push(Violation::RepeatedOption {
                    key: key.to_string(),
                    count: values.len(),
                });
                None
            }
        }
    }

    /// Claim a single-valued key that must not be blank.
    pub fn single_non_empty(&mut self, key: &'a str) -> Option<&'a str> {
        let value = self.single(key)?;
        if value.trim().is_empty() {
            self.malformed(key, "value is empty");
            return None;
        }
        Some(value)
    }

    pub fn malformed(&mut self, key: &str, reason: impl Into<String>) {
        self.violations.push(Violation::MalformedOption {
            key: key.to_string(),
            reason: reason.into(),
        });
    }

    /// Finish the decode, failing if any key went unclaimed or any value was bad.
    pub fn finish(mut self) -> Result<(), Vec<Violation>> {
        let unknown: Vec<String> = self
            .options
            .keys()
            .filter(|key| !self.recognised.contains(key))
            .map(str::to_string)
            .collect();
        if !unknown.is_empty() {
            self.violations.push(Violation::UnknownOptions(unknown));
        }
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(self.violations)
        }
    }
}

/// Parse a yes/no flag. Only `true`, `yes` and `y` (any case) are true.
pub fn parse_flag(value: &str) -> bool {
    matches!(value.to_ascii_lowercase().as_str(), "true" | "yes" | "y")
}
