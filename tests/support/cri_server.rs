//! In-process CRI runtime service listening on a Unix socket.

use std::path::Path;
use std::task::{Context, Poll};
use tonic::codegen::{http, BoxFuture};

#[derive(Clone, PartialEq, prost::Message)]
pub struct VersionRequest {
    #[prost(string, tag = "1")]
    pub version: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct VersionResponse {
    #[prost(string, tag = "1")]
    pub version: String,
    #[prost(string, tag = "2")]
    pub runtime_name: String,
    #[prost(string, tag = "3")]
    pub runtime_version: String,
    #[prost(string, tag = "4")]
    pub runtime_api_version: String,
}

/// Answers every call as `runtime.v1.RuntimeService/Version`.
#[derive(Clone)]
struct RuntimeService {
    runtime_version: String,
}

impl tonic::server::NamedService for RuntimeService {
    const NAME: &'static str = "runtime.v1.RuntimeService";
}

impl tonic::server::UnaryService<VersionRequest> for RuntimeService {
    type Response = VersionResponse;
    type Future = BoxFuture<tonic::Response<Self::Response>, tonic::Status>;

    fn call(&mut self, request: tonic::Request<VersionRequest>) -> Self::Future {
        let api_version = request.into_inner().version;
        let response = VersionResponse {
            version: "0.1.0".to_string(),
            runtime_name: "containerd".to_string(),
            runtime_version: self.runtime_version.clone(),
            runtime_api_version: api_version,
        };
        Box::pin(async move { Ok(tonic::Response::new(response)) })
    }
}

impl tower::Service<http::Request<tonic::body::Body>> for RuntimeService {
    type Response = http::Response<tonic::body::Body>;
    type Error = std::convert::Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<tonic::body::Body>) -> Self::Future {
        let method = self.clone();
        Box::pin(async move {
            let codec = tonic_prost::ProstCodec::<VersionResponse, VersionRequest>::default();
            let mut grpc = tonic::server::Grpc::new(codec);
            Ok(grpc.unary(method, req).await)
        })
    }
}

/// Bind `path` and serve the runtime service on it for the rest of the test.
///
/// Must be called from within a tokio runtime.
pub fn serve(path: &Path, runtime_version: &str) {
    let listener = tokio::net::UnixListener::bind(path).unwrap();
    let incoming = tokio_stream::wrappers::UnixListenerStream::new(listener);
    let service = RuntimeService {
        runtime_version: runtime_version.to_string(),
    };
    tokio::spawn(
        tonic::transport::Server::builder()
            .add_service(service)
            .serve_with_incoming(incoming),
    );
}
