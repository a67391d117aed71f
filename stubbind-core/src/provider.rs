//! # Connection Providers
//!
//! A [`ConnectionProvider`] resolves an [`Endpoint`] plus a security flag into a reusable
//! connection. Whether that connection is cached, pooled or freshly dialed is the provider's
//! own policy; the binder only asks for one and hands it to a stub.
//!
//! [`channel::ChannelProvider`] is the default implementation over `tonic` channels.
use crate::Endpoint;
use std::sync::Arc;

pub mod channel;
pub mod config;

/// Resolves endpoints into connections.
pub trait ConnectionProvider {
    type Connection;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Returns a connection to `endpoint`, secured with TLS when `secure` is set.
    fn connection(
        &self,
        endpoint: &Endpoint,
        secure: bool,
    ) -> Result<Self::Connection, Self::Error>;
}

impl<P> ConnectionProvider for &P
where
    P: ConnectionProvider + ?Sized,
{
    type Connection = P::Connection;
    type Error = P::Error;

    fn connection(
        &self,
        endpoint: &Endpoint,
        secure: bool,
    ) -> Result<Self::Connection, Self::Error> {
        (**self).connection(endpoint, secure)
    }
}

impl<P> ConnectionProvider for Arc<P>
where
    P: ConnectionProvider + ?Sized,
{
    type Connection = P::Connection;
    type Error = P::Error;

    fn connection(
        &self,
        endpoint: &Endpoint,
        secure: bool,
    ) -> Result<Self::Connection, Self::Error> {
        (**self).connection(endpoint, secure)
    }
}
