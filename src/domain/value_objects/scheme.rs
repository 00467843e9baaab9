//! Scheme value object - which transport a destination URI selects.

use std::fmt;
use std::str::FromStr;

use crate::error::FerryError;

/// Supported destination schemes.
///
/// Matching is case-insensitive; the canonical spelling is lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scheme {
    /// `file://` - copy into a local directory
    File,
    /// `scp://` - persistent in-process SSH session
    Scp,
    /// `cscp://` - external `scp`/`ssh` processes per transfer
    Cscp,
    /// `http://` - multipart upload
    Http,
    /// `https://` - multipart upload over TLS
    Https,
}

impl Scheme {
    pub const ALL: [Scheme; 5] = [
        Scheme::File,
        Scheme::Scp,
        Scheme::Cscp,
        Scheme::Http,
        Scheme::Https,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::File => "file",
            Scheme::Scp => "scp",
            Scheme::Cscp => "cscp",
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    /// Default port when neither the URI nor SSH config names one
    pub fn default_port(&self) -> Option<u16> {
        match self {
            Scheme::File => None,
            Scheme::Scp | Scheme::Cscp => Some(22),
            Scheme::Http => Some(80),
            Scheme::Https => Some(443),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = FerryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        Scheme::ALL
            .into_iter()
            .find(|scheme| scheme.as_str() == lower)
            .ok_or_else(|| FerryError::UnsupportedScheme {
                scheme: s.to_string(),
            })
    }
}
