//! # Stub Binder
//!
//! The [`StubBinder`] turns a [`ServiceDescriptor`] plus a connection into a client [`Stub`].
//!
//! It has two ways in:
//!
//! 1. **[`StubBinder::bind_by_connection`]**: the caller already holds a connection. The binder
//!    picks the descriptor's entry point for the requested [`InvocationMode`] and calls it.
//! 2. **[`StubBinder::bind_by_endpoint`]**: the caller only knows an [`Endpoint`]. The binder
//!    validates it, asks its [`ConnectionProvider`] for a connection and then binds by connection.
//!
//! The binder holds nothing but its provider. It never closes, retains or mutates the
//! connections it passes along, and it never retries.
use crate::{
    BoxError, ConnectionProvider, Endpoint,
    descriptor::{InvocationMode, ServiceDescriptor, Stub},
};

/// Errors raised while constructing a stub from a connection.
#[derive(Debug, thiserror::Error)]
pub enum StubError {
    #[error("Service '{service}' does not publish a {mode} stub")]
    UnsupportedServiceKind {
        service: &'static str,
        mode: InvocationMode,
    },
    #[error("Failed to construct {mode} stub for service '{service}': '{source}'")]
    StubConstructionFailed {
        service: &'static str,
        mode: InvocationMode,
        #[source]
        source: BoxError,
    },
}

/// Errors raised while binding a stub to an endpoint.
///
/// `E` is the error type of the [`ConnectionProvider`], passed through untouched.
#[derive(Debug, thiserror::Error)]
pub enum BindError<E> {
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),
    #[error(transparent)]
    Connection(E),
    #[error(transparent)]
    Stub(#[from] StubError),
}

/// Builds client stubs over connections obtained from a [`ConnectionProvider`].
#[derive(Debug, Clone)]
pub struct StubBinder<P> {
    provider: P,
}

impl<P> StubBinder<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }
}

impl<P> StubBinder<P>
where
    P: ConnectionProvider,
{
    /// Builds a stub for `mode` over an existing connection.
    ///
    /// # Returns
    ///
    /// * `Ok(Stub)` - A stub of the requested mode, bound to `connection`.
    /// * `Err(StubError::UnsupportedServiceKind)` - The descriptor has no entry point for `mode`.
    /// * `Err(StubError::StubConstructionFailed)` - The entry point itself failed.
    pub fn bind_by_connection<D>(
        &self,
        mode: InvocationMode,
        descriptor: &D,
        connection: P::Connection,
    ) -> Result<Stub<D::BlockingStub, D::AsyncStub>, StubError>
    where
        D: ServiceDescriptor<P::Connection> + ?Sized,
    {
        match mode {
            InvocationMode::Blocking => self
                .blocking_stub_by_connection(descriptor, connection)
                .map(Stub::Blocking),
            InvocationMode::NonBlocking => self
                .async_stub_by_connection(descriptor, connection)
                .map(Stub::NonBlocking),
        }
    }

    /// Builds a stub for `mode` over a connection to `endpoint` from the provider.
    ///
    /// # Returns
    ///
    /// * `Ok(Stub)` - A stub of the requested mode.
    /// * `Err(BindError::InvalidArgument)` - The endpoint is malformed. The provider is not called.
    /// * `Err(BindError::Connection)` - The provider failed, its error is returned as is.
    /// * `Err(BindError::Stub)` - See [`StubBinder::bind_by_connection`].
    pub fn bind_by_endpoint<D>(
        &self,
        mode: InvocationMode,
        descriptor: &D,
        endpoint: &Endpoint,
        secure: bool,
    ) -> Result<Stub<D::BlockingStub, D::AsyncStub>, BindError<P::Error>>
    where
        D: ServiceDescriptor<P::Connection> + ?Sized,
    {
        let connection = self.connect(endpoint, secure)?;
        Ok(self.bind_by_connection(mode, descriptor, connection)?)
    }

    /// Builds the descriptor's blocking stub over an existing connection.
    pub fn blocking_stub_by_connection<D>(
        &self,
        descriptor: &D,
        connection: P::Connection,
    ) -> Result<D::BlockingStub, StubError>
    where
        D: ServiceDescriptor<P::Connection> + ?Sized,
    {
        let entry_point = descriptor.blocking_entry_point();
        construct(
            descriptor.service_name(),
            InvocationMode::Blocking,
            entry_point,
            connection,
        )
    }

    /// Builds the descriptor's non-blocking stub over an existing connection.
    pub fn async_stub_by_connection<D>(
        &self,
        descriptor: &D,
        connection: P::Connection,
    ) -> Result<D::AsyncStub, StubError>
    where
        D: ServiceDescriptor<P::Connection> + ?Sized,
    {
        let entry_point = descriptor.async_entry_point();
        construct(
            descriptor.service_name(),
            InvocationMode::NonBlocking,
            entry_point,
            connection,
        )
    }

    /// Builds the descriptor's blocking stub over a connection to `endpoint`.
    pub fn blocking_stub<D>(
        &self,
        descriptor: &D,
        endpoint: &Endpoint,
        secure: bool,
    ) -> Result<D::BlockingStub, BindError<P::Error>>
    where
        D: ServiceDescriptor<P::Connection> + ?Sized,
    {
        let connection = self.connect(endpoint, secure)?;
        Ok(self.blocking_stub_by_connection(descriptor, connection)?)
    }

    /// Builds the descriptor's non-blocking stub over a connection to `endpoint`.
    pub fn async_stub<D>(
        &self,
        descriptor: &D,
        endpoint: &Endpoint,
        secure: bool,
    ) -> Result<D::AsyncStub, BindError<P::Error>>
    where
        D: ServiceDescriptor<P::Connection> + ?Sized,
    {
        let connection = self.connect(endpoint, secure)?;
        Ok(self.async_stub_by_connection(descriptor, connection)?)
    }

    fn connect(
        &self,
        endpoint: &Endpoint,
        secure: bool,
    ) -> Result<P::Connection, BindError<P::Error>> {
        if let Some(reason) = endpoint.malformed_reason() {
            return Err(BindError::InvalidArgument(reason));
        }

        self.provider
            .connection(endpoint, secure)
            .map_err(BindError::Connection)
    }
}

fn construct<C, S>(
    service: &'static str,
    mode: InvocationMode,
    entry_point: Option<crate::EntryPoint<C, S>>,
    connection: C,
) -> Result<S, StubError> {
    let entry_point = entry_point.ok_or(StubError::UnsupportedServiceKind { service, mode })?;

    let stub = entry_point(connection).map_err(|source| StubError::StubConstructionFailed {
        service,
        mode,
        source,
    })?;

    tracing::debug!(service, %mode, "bound stub");

    Ok(stub)
}
