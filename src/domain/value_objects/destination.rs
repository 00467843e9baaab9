//! Destination value object - a parsed backup destination URI.
//!
//! Format: `<scheme>://[user[:password]@]host[:port]/<path>[?key=value&...]`
//!
//! Parsing only checks URI grammar and the scheme. Option semantics belong to
//! the transport that consumes the destination.

use std::fmt;

use percent_encoding::percent_decode_str;
use url::Url;

use super::{QueryOptions, Scheme};
use crate::error::{FerryError, FerryResult, Violation};

/// Immutable, reusable description of where a file should be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    scheme: Scheme,
    host: Option<String>,
    port: Option<u16>,
    username: Option<String>,
    password: Option<String>,
    path: String,
    options: QueryOptions,
    url: Url,
}

impl Destination {
    /// Parse a destination URI.
    pub fn parse(uri: &str) -> FerryResult<Self> {
        let url = Url::parse(uri.trim()).map_err(|e| {
            FerryError::configuration(redact_raw(uri), Violation::constraint(e.to_string()))
        })?;
        let scheme: Scheme = url.scheme().parse()?;

        let host = url
            .host_str()
            .filter(|h| !h.is_empty())
            .map(|h| decode(h.trim_start_matches('[').trim_end_matches(']')));
        let username = Some(url.username())
            .filter(|u| !u.is_empty())
            .map(decode);
        let password = url.password().map(decode);
        let options = QueryOptions::from_pairs(
            url.query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        );

        Ok(Self {
            scheme,
            host,
            port: url.port(),
            username,
            password,
            path: decode(url.path()),
            options,
            url,
        })
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Port given in the URI, if any
    pub fn port(&self) -> Option<u16> {
        self.port
    }

    /// Port given in the URI, else the scheme default
    pub fn port_or_default(&self) -> Option<u16> {
        self.port.or_else(|| self.scheme.default_port())
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    /// Percent-decoded path component
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn options(&self) -> &QueryOptions {
        &self.options
    }

    /// The URI without its query string, as sent on the wire for HTTP
    pub fn endpoint(&self) -> Url {
        let mut endpoint = self.url.clone();
        endpoint.set_query(None);
        endpoint.set_fragment(None);
        endpoint
    }

    /// Identity used in logs and errors; never includes the password
    pub fn display_name(&self) -> String {
        let mut shown = self.url.clone();
        if shown.password().is_some() {
            let _ = shown.set_password(Some("***"));
        }
        shown.to_string()
    }

    /// Build a configuration error for this destination
    pub fn reject(&self, violations: Vec<Violation>) -> FerryError {
        FerryError::Configuration {
            destination: self.display_name(),
            violations,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

impl std::str::FromStr for Destination {
    type Err = FerryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Best-effort password redaction for strings that failed to parse
fn redact_raw(uri: &str) -> String {
    let Some((scheme, rest)) = uri.split_once("://") else {
        return uri.to_string();
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);
    match authority.rsplit_once('@') {
        Some((userinfo, host)) => match userinfo.split_once(':') {
            Some((user, _)) => format!("{scheme}://{user}:***@{host}{tail}"),
            None => uri.to_string(),
        },
        None => uri.to_string(),
    }
}
