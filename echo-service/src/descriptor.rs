use crate::{
    blocking::EchoServiceBlockingClient,
    pb::{echo_service_client::EchoServiceClient, echo_service_server::SERVICE_NAME},
};
use stubbind_core::{EntryPoint, ServiceDescriptor};
use tonic::codegen::{Body, Bytes, StdError};

/// Stub constructors of `echo.EchoService`, for any `tonic` transport `T`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EchoServiceDescriptor;

impl<T> ServiceDescriptor<T> for EchoServiceDescriptor
where
    T: tonic::client::GrpcService<tonic::body::Body>,
    T::Error: Into<StdError>,
    T::ResponseBody: Body<Data = Bytes> + Send + 'static,
    <T::ResponseBody as Body>::Error: Into<StdError> + Send,
{
    type BlockingStub = EchoServiceBlockingClient<T>;
    type AsyncStub = EchoServiceClient<T>;

    fn service_name(&self) -> &'static str {
        SERVICE_NAME
    }

    fn blocking_entry_point(&self) -> Option<EntryPoint<T, Self::BlockingStub>> {
        Some(|connection| Ok(EchoServiceBlockingClient::new(connection)?))
    }

    fn async_entry_point(&self) -> Option<EntryPoint<T, Self::AsyncStub>> {
        Some(|connection| Ok(EchoServiceClient::new(connection)))
    }
}
