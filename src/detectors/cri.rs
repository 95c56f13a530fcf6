//! CRI socket detector (containerd, CRI-O).

use super::{bounded, FamilyDetector};
use crate::detection::is_socket;
use crate::{DetectOptions, DetectionError, Runtime, RuntimeFamily, RuntimeName};
use async_trait::async_trait;
use hyper_util::rt::TokioIo;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::UnixStream;
use tokio::time::{timeout_at, Instant};
use tonic::codegen::http::uri::PathAndQuery;
use tonic::transport::{Endpoint, Uri};
use tower::service_fn;

/// Well-known CRI sockets in order of preference.
const CRI_SOCKETS: &[(&str, RuntimeName)] = &[
    // canonical location
    ("/run/containerd/containerd.sock", RuntimeName::Containerd),
    // symlink target on older systems
    ("/var/run/containerd/containerd.sock", RuntimeName::Containerd),
    // k3s / RKE2
    ("/run/k3s/containerd/containerd.sock", RuntimeName::Containerd),
    ("/var/run/crio/crio.sock", RuntimeName::Crio),
];

/// CRI API version sent in the version request.
const CRI_API_VERSION: &str = "v1";

const VERSION_METHOD: &str = "/runtime.v1.RuntimeService/Version";

/// Messages of the `runtime.v1.RuntimeService/Version` call.
mod proto {
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
}

/// A socket path and the runtime expected to listen on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketCandidate {
    /// Filesystem path of the socket.
    pub path: PathBuf,
    /// Runtime reported when this socket answers.
    pub name: RuntimeName,
}

impl SocketCandidate {
    /// Candidate for the socket at `path`, reported as `name` when it answers.
    pub fn new(path: impl Into<PathBuf>, name: RuntimeName) -> Self {
        Self {
            path: path.into(),
            name,
        }
    }
}

/// Detects a CRI runtime daemon through its gRPC socket.
///
/// The first candidate path that is a live socket file is queried with the
/// CRI `Version` call. Other candidates are not considered once one is
/// found. Missing sockets and unreachable daemons are both detector
/// failures.
#[derive(Debug, Clone)]
pub struct CriDetector {
    sockets: Vec<SocketCandidate>,
    timeout: Duration,
}

impl CriDetector {
    /// Detector over the well-known containerd and CRI-O sockets.
    pub fn new() -> Self {
        Self::with_options(&DetectOptions::default())
    }

    /// Default sockets with the RPC timeout from `options`.
    pub fn with_options(options: &DetectOptions) -> Self {
        Self {
            sockets: CRI_SOCKETS
                .iter()
                .map(|(path, name)| SocketCandidate::new(*path, *name))
                .collect(),
            timeout: options.rpc_timeout,
        }
    }

    /// Replace the candidate socket list.
    pub fn with_sockets(mut self, sockets: Vec<SocketCandidate>) -> Self {
        self.sockets = sockets;
        self
    }

    /// Change the connection and RPC timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Candidate sockets in search order.
    pub fn sockets(&self) -> &[SocketCandidate] {
        &self.sockets
    }

    fn find_socket(&self) -> Option<&SocketCandidate> {
        self.sockets.iter().find(|candidate| {
            let found = is_socket(&candidate.path);
            if !found {
                tracing::debug!(path = %candidate.path.display(), "no CRI socket");
            }
            found
        })
    }

    async fn query_version(&self, socket: &Path, deadline: Instant) -> Result<String, String> {
        let socket_path = socket.to_path_buf();
        let request = async move {
            let channel = Endpoint::from_static("http://[::]:50051")
                .connect_with_connector(service_fn(move |_: Uri| {
                    let socket_path = socket_path.clone();
                    async move {
                        let stream = UnixStream::connect(socket_path).await?;
                        Ok::<_, std::io::Error>(TokioIo::new(stream))
                    }
                }))
                .await
                .map_err(|e| format!("failed to connect: {}", e))?;

            let mut client = tonic::client::Grpc::new(channel);
            client
                .ready()
                .await
                .map_err(|e| format!("service not ready: {}", e))?;

            let response = client
                .unary(
                    tonic::Request::new(proto::VersionRequest {
                        version: CRI_API_VERSION.to_string(),
                    }),
                    PathAndQuery::from_static(VERSION_METHOD),
                    tonic_prost::ProstCodec::<proto::VersionRequest, proto::VersionResponse>::default(),
                )
                .await
                .map_err(|status| format!("CRI Version call failed: {}", status.message()))?;

            Ok::<_, String>(response.into_inner().runtime_version)
        };

        timeout_at(bounded(deadline, self.timeout), request)
            .await
            .map_err(|_| "deadline exceeded".to_string())?
    }
}

impl Default for CriDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FamilyDetector for CriDetector {
    fn family(&self) -> RuntimeFamily {
        RuntimeFamily::Cri
    }

    async fn detect(&self, deadline: Instant) -> Result<Vec<Runtime>, DetectionError> {
        let candidate = self
            .find_socket()
            .ok_or_else(|| DetectionError::SocketNotFound {
                family: RuntimeFamily::Cri,
                searched: self.sockets.iter().map(|c| c.path.clone()).collect(),
            })?;

        let version = self
            .query_version(&candidate.path, deadline)
            .await
            .map_err(|reason| DetectionError::VersionQueryFailed {
                family: RuntimeFamily::Cri,
                socket: candidate.path.clone(),
                reason,
            })?;

        tracing::debug!(
            runtime = %candidate.name,
            socket = %candidate.path.display(),
            %version,
            "found CRI runtime"
        );

        Ok(vec![Runtime::new(
            candidate.name,
            version,
            candidate.path.clone(),
        )])
    }
}
