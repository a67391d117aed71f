//! # Endpoint
//!
//! The address of a remote gRPC target. An [`Endpoint`] is an immutable `host:port` pair;
//! the security mode is chosen separately when a connection is requested for it.
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointParseError {
    #[error("Endpoint '{0}' is missing a port, expected 'host:port'")]
    MissingPort(String),
    #[error("Invalid port in endpoint '{addr}': '{source}'")]
    InvalidPort {
        addr: String,
        source: std::num::ParseIntError,
    },
    #[error("Endpoint '{0}' has an empty host")]
    EmptyHost(String),
    #[error("Endpoint '{0}' has unbalanced brackets around its host")]
    UnbalancedBrackets(String),
    #[error("Endpoint '{addr}' has an invalid host: {reason}")]
    InvalidHost {
        addr: String,
        reason: &'static str,
    },
}

/// Identifies a remote service target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    host: String,
    port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Returns the reason this endpoint cannot be dialed, if any.
    ///
    /// An endpoint is malformed when its host is blank, contains whitespace or brackets,
    /// or its port is 0.
    pub fn malformed_reason(&self) -> Option<&'static str> {
        if self.host.trim().is_empty() {
            Some("endpoint host cannot be empty")
        } else if let Some(reason) = host_violation(&self.host) {
            Some(reason)
        } else if self.port == 0 {
            Some("endpoint port cannot be 0")
        } else {
            None
        }
    }

    /// Builds the URI used to dial this endpoint.
    ///
    /// Secure endpoints use the `https` scheme, plaintext ones `http`.
    pub fn uri(&self, secure: bool) -> String {
        let scheme = if secure { "https" } else { "http" };
        format!("{scheme}://{self}")
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // IPv6 literals must be bracketed so the port separator stays unambiguous
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

impl FromStr for Endpoint {
    type Err = EndpointParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (host, port) = s
            .rsplit_once(':')
            .ok_or_else(|| EndpointParseError::MissingPort(s.to_string()))?;

        let host = match (host.strip_prefix('['), host.ends_with(']')) {
            (Some(inner), true) => &inner[..inner.len() - 1],
            (None, false) => host,
            _ => return Err(EndpointParseError::UnbalancedBrackets(s.to_string())),
        };

        if host.trim().is_empty() {
            return Err(EndpointParseError::EmptyHost(s.to_string()));
        }

        if let Some(reason) = host_violation(host) {
            return Err(EndpointParseError::InvalidHost {
                addr: s.to_string(),
                reason,
            });
        }

        let port = port
            .parse::<u16>()
            .map_err(|source| EndpointParseError::InvalidPort {
                addr: s.to_string(),
                source,
            })?;

        Ok(Self::new(host, port))
    }
}

fn host_violation(host: &str) -> Option<&'static str> {
    if host.chars().any(char::is_whitespace) {
        Some("endpoint host cannot contain whitespace")
    } else if host.contains(['[', ']']) {
        Some("endpoint host cannot contain brackets")
    } else {
        None
    }
}
