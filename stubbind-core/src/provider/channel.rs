//! # Channel Provider
//!
//! The default [`ConnectionProvider`], handing out `tonic::transport::Channel`s.
//!
//! ## Reuse policy
//!
//! One channel is kept per `(endpoint, secure)` pair. A `Channel` is a cheap handle over a
//! shared HTTP/2 connection, so every stub bound to the same target multiplexes over the
//! same transport. Channels are created with `connect_lazy`: the first RPC dials, and a
//! target that is down surfaces as a `tonic::Status` on that call rather than here.
//!
//! Dialing happens outside the cache lock. When two callers race on the same pair, the first
//! channel inserted wins and the other is dropped before it ever connects. The configured CA
//! certificate is read from disk once, on the first secure dial.
//!
//! Because lazy channels spawn their worker on the ambient Tokio runtime, connections can only
//! be requested from within one.
use super::{ConnectionProvider, config::ChannelConfig};
use crate::Endpoint;
use parking_lot::Mutex;
use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};
use tonic::transport::{Certificate, Channel, ClientTlsConfig};

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Invalid URI '{uri}': '{source}'")]
    InvalidUri {
        uri: String,
        #[source]
        source: tonic::transport::Error,
    },
    #[error("Invalid user agent '{user_agent}': '{source}'")]
    InvalidUserAgent {
        user_agent: String,
        #[source]
        source: tonic::transport::Error,
    },
    #[error("Failed to read CA certificate '{path}': '{source}'")]
    ReadCertificate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to configure TLS for '{endpoint}': '{source}'")]
    Tls {
        endpoint: Endpoint,
        #[source]
        source: tonic::transport::Error,
    },
    #[error("Channels can only be created from within a Tokio runtime: '{0}'")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Dials and caches `tonic` channels.
#[derive(Debug, Default)]
pub struct ChannelProvider {
    config: ChannelConfig,
    channels: Mutex<HashMap<(Endpoint, bool), Channel>>,
    ca_certificate: Mutex<Option<Certificate>>,
}

impl ChannelProvider {
    pub fn new(config: ChannelConfig) -> Self {
        Self {
            config,
            channels: Mutex::new(HashMap::new()),
            ca_certificate: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Number of channels currently cached.
    pub fn cached_channels(&self) -> usize {
        self.channels.lock().len()
    }

    /// Drops the cached channel for `(endpoint, secure)`.
    ///
    /// Stubs already holding the channel keep working; the next request for this pair dials
    /// a fresh one. Returns whether a channel was cached.
    pub fn evict(&self, endpoint: &Endpoint, secure: bool) -> bool {
        let evicted = self
            .channels
            .lock()
            .remove(&(endpoint.clone(), secure))
            .is_some();

        if evicted {
            tracing::debug!(%endpoint, secure, "evicted cached channel");
        }

        evicted
    }

    fn dial(&self, endpoint: &Endpoint, secure: bool) -> Result<Channel, ChannelError> {
        // Lazy channels spawn their buffer worker right away
        tokio::runtime::Handle::try_current()?;

        let uri = endpoint.uri(secure);
        let mut builder = tonic::transport::Endpoint::from_shared(uri.clone())
            .map_err(|source| ChannelError::InvalidUri { uri, source })?;

        let config = &self.config;

        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(interval) = config.http2_keep_alive_interval() {
            builder = builder.http2_keep_alive_interval(interval);
        }
        if let Some(timeout) = config.keep_alive_timeout() {
            builder = builder.keep_alive_timeout(timeout);
        }
        if let Some(limit) = config.concurrency_limit {
            builder = builder.concurrency_limit(limit);
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone()).map_err(|source| {
                ChannelError::InvalidUserAgent {
                    user_agent: user_agent.clone(),
                    source,
                }
            })?;
        }

        builder = builder
            .tcp_keepalive(config.tcp_keepalive())
            .keep_alive_while_idle(config.keep_alive_while_idle);

        if secure {
            builder = builder
                .tls_config(self.tls_config(endpoint)?)
                .map_err(|source| ChannelError::Tls {
                    endpoint: endpoint.clone(),
                    source,
                })?;
        }

        tracing::debug!(%endpoint, secure, "dialing lazy channel");

        Ok(builder.connect_lazy())
    }

    fn tls_config(&self, endpoint: &Endpoint) -> Result<ClientTlsConfig, ChannelError> {
        let tls = &self.config.tls;
        let domain = tls
            .domain_name
            .clone()
            .unwrap_or_else(|| endpoint.host().to_string());

        let client_config = ClientTlsConfig::new().domain_name(domain);

        match &tls.ca_certificate {
            Some(path) => Ok(client_config.ca_certificate(self.load_ca_certificate(path)?)),
            None => Ok(client_config.with_webpki_roots()),
        }
    }

    fn load_ca_certificate(&self, path: &Path) -> Result<Certificate, ChannelError> {
        let mut cached = self.ca_certificate.lock();

        if let Some(certificate) = cached.as_ref() {
            return Ok(certificate.clone());
        }

        let pem = fs::read(path).map_err(|source| ChannelError::ReadCertificate {
            path: path.to_path_buf(),
            source,
        })?;
        let certificate = Certificate::from_pem(pem);
        *cached = Some(certificate.clone());

        tracing::debug!(path = %path.display(), "loaded CA certificate");

        Ok(certificate)
    }
}

impl ConnectionProvider for ChannelProvider {
    type Connection = Channel;
    type Error = ChannelError;

    fn connection(&self, endpoint: &Endpoint, secure: bool) -> Result<Channel, ChannelError> {
        let key = (endpoint.clone(), secure);

        if let Some(channel) = self.channels.lock().get(&key) {
            tracing::trace!(%endpoint, secure, "reusing cached channel");
            return Ok(channel.clone());
        }

        let channel = self.dial(endpoint, secure)?;

        Ok(self.channels.lock().entry(key).or_insert(channel).clone())
    }
}
