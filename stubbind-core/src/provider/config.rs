//! # Channel Configuration
//!
//! Transport settings applied by [`super::channel::ChannelProvider`] to every channel it dials.
//! The configuration is plain JSON; every field is optional and missing fields take the
//! defaults below.
//!
//! ```json
//! {
//!   "connect_timeout_ms": 3000,
//!   "request_timeout_ms": 10000,
//!   "tcp_keepalive_ms": 60000,
//!   "tls": { "ca_certificate": "/etc/ssl/ca.pem", "domain_name": "api.internal" }
//! }
//! ```
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': '{source}'")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid channel configuration: '{0}'")]
    Parse(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ChannelConfig {
    pub connect_timeout_ms: Option<u64>,
    pub request_timeout_ms: Option<u64>,
    pub tcp_keepalive_ms: Option<u64>,
    pub http2_keep_alive_interval_ms: Option<u64>,
    pub keep_alive_timeout_ms: Option<u64>,
    pub keep_alive_while_idle: bool,
    pub concurrency_limit: Option<usize>,
    pub user_agent: Option<String>,
    pub tls: TlsConfig,
}

/// TLS material for secure channels.
///
/// Without a CA certificate the webpki root store is trusted.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TlsConfig {
    pub ca_certificate: Option<PathBuf>,
    pub domain_name: Option<String>,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: Some(5_000),
            request_timeout_ms: None,
            tcp_keepalive_ms: Some(60_000),
            http2_keep_alive_interval_ms: None,
            keep_alive_timeout_ms: None,
            keep_alive_while_idle: false,
            concurrency_limit: None,
            user_agent: None,
            tls: TlsConfig::default(),
        }
    }
}

impl ChannelConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_ms.map(Duration::from_millis)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    pub fn tcp_keepalive(&self) -> Option<Duration> {
        self.tcp_keepalive_ms.map(Duration::from_millis)
    }

    pub fn http2_keep_alive_interval(&self) -> Option<Duration> {
        self.http2_keep_alive_interval_ms.map(Duration::from_millis)
    }

    pub fn keep_alive_timeout(&self) -> Option<Duration> {
        self.keep_alive_timeout_ms.map(Duration::from_millis)
    }
}
