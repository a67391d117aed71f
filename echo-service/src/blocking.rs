//! # Blocking Echo Client
//!
//! `tonic` only generates asynchronous clients. [`EchoServiceBlockingClient`] drives the
//! generated [`EchoServiceClient`] to completion on a Tokio runtime handle, so callers on
//! plain threads can issue calls synchronously.
use crate::pb::{EchoRequest, EchoResponse, echo_service_client::EchoServiceClient};
use tokio::runtime::{Handle, TryCurrentError};
use tonic::codegen::{Body, Bytes, StdError};

/// Synchronous stub for `echo.EchoService`.
#[derive(Debug, Clone)]
pub struct EchoServiceBlockingClient<T> {
    inner: EchoServiceClient<T>,
    handle: Handle,
}

impl<T> EchoServiceBlockingClient<T>
where
    T: tonic::client::GrpcService<tonic::body::Body>,
    T::Error: Into<StdError>,
    T::ResponseBody: Body<Data = Bytes> + Send + 'static,
    <T::ResponseBody as Body>::Error: Into<StdError> + Send,
{
    /// Creates a blocking client driven by the current Tokio runtime.
    ///
    /// Fails when called outside of a runtime context.
    pub fn new(inner: T) -> Result<Self, TryCurrentError> {
        let handle = Handle::try_current()?;
        Ok(Self::with_handle(inner, handle))
    }

    pub fn with_handle(inner: T, handle: Handle) -> Self {
        Self {
            inner: EchoServiceClient::new(inner),
            handle,
        }
    }

    /// Sends a unary echo and waits for the response.
    ///
    /// # Panics
    ///
    /// Like [`Handle::block_on`], this panics when called from an asynchronous execution
    /// context. Use it from plain threads or `spawn_blocking`.
    pub fn unary_echo(
        &mut self,
        request: impl tonic::IntoRequest<EchoRequest>,
    ) -> Result<tonic::Response<EchoResponse>, tonic::Status> {
        self.handle.block_on(self.inner.unary_echo(request))
    }
}
