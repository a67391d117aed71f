use echo_service::EchoService;
use echo_service::pb::{EchoRequest, EchoResponse};
use tonic::{Request, Response, Status};

#[derive(Debug)]
pub struct EchoServiceImpl;

#[tonic::async_trait]
impl EchoService for EchoServiceImpl {
    async fn unary_echo(
        &self,
        req: Request<EchoRequest>,
    ) -> Result<Response<EchoResponse>, Status> {
        let message = req.into_inner().message;

        if message.is_empty() {
            return Err(Status::invalid_argument("message cannot be empty"));
        }

        Ok(Response::new(EchoResponse { message }))
    }
}
