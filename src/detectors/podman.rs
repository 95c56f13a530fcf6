//! Podman socket detector.

use super::{bounded, FamilyDetector};
use crate::detection::{current_uid, is_socket};
use crate::{DetectOptions, DetectionError, Runtime, RuntimeFamily, RuntimeName};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper_util::rt::TokioIo;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::net::UnixStream;
use tokio::time::{timeout_at, Instant};

const ROOTFUL_PODMAN: &str = "/run/podman/podman.sock";

const VERSION_ENDPOINT: &str = "/v4.0.0/libpod/version";

/// The part of the libpod version response we use.
#[derive(Debug, Deserialize)]
struct VersionBody {
    #[serde(rename = "Version")]
    version: String,
}

/// Detects the Podman API service through its socket.
///
/// Sockets are checked in order:
/// 1. Rootless Podman socket (`/run/user/$UID/podman/podman.sock`)
/// 2. Rootful Podman socket (`/run/podman/podman.sock`)
///
/// The first live socket is asked for its version over the libpod REST API.
#[derive(Debug, Clone)]
pub struct PodmanDetector {
    sockets: Vec<PathBuf>,
    timeout: Duration,
}

impl PodmanDetector {
    /// Detector over the rootless and rootful Podman sockets.
    pub fn new() -> Self {
        Self::with_options(&DetectOptions::default())
    }

    /// Default sockets with the RPC timeout from `options`.
    pub fn with_options(options: &DetectOptions) -> Self {
        Self {
            sockets: default_sockets(current_uid()),
            timeout: options.rpc_timeout,
        }
    }

    /// Replace the candidate socket list.
    pub fn with_sockets(mut self, sockets: Vec<PathBuf>) -> Self {
        self.sockets = sockets;
        self
    }

    /// Change the connection and request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Candidate sockets in search order.
    pub fn sockets(&self) -> &[PathBuf] {
        &self.sockets
    }

    async fn query_version(&self, socket: &Path, deadline: Instant) -> Result<String, String> {
        let request = async {
            let stream = UnixStream::connect(socket)
                .await
                .map_err(|e| format!("failed to connect to socket: {}", e))?;

            let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
                .await
                .map_err(|e| format!("HTTP handshake failed: {}", e))?;

            tokio::spawn(async move {
                if let Err(e) = conn.await {
                    tracing::debug!("podman connection closed: {}", e);
                }
            });

            let req = hyper::Request::builder()
                .method("GET")
                .uri(VERSION_ENDPOINT)
                .header("Host", "localhost")
                .body(Empty::<Bytes>::new())
                .map_err(|e| format!("failed to build request: {}", e))?;

            let resp = sender
                .send_request(req)
                .await
                .map_err(|e| format!("request failed: {}", e))?;

            let status = resp.status();
            let body = resp
                .into_body()
                .collect()
                .await
                .map_err(|e| format!("failed to read response: {}", e))?
                .to_bytes();

            if !status.is_success() {
                return Err(format!(
                    "libpod API returned {}: {}",
                    status,
                    String::from_utf8_lossy(&body).trim()
                ));
            }

            serde_json::from_slice::<VersionBody>(&body)
                .map(|parsed| parsed.version)
                .map_err(|e| format!("invalid version response: {}", e))
        };

        timeout_at(bounded(deadline, self.timeout), request)
            .await
            .map_err(|_| "deadline exceeded".to_string())?
    }
}

impl Default for PodmanDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn default_sockets(uid: Option<u32>) -> Vec<PathBuf> {
    let rootless = uid.map(|uid| PathBuf::from(format!("/run/user/{}/podman/podman.sock", uid)));
    rootless
        .into_iter()
        .chain(std::iter::once(PathBuf::from(ROOTFUL_PODMAN)))
        .collect()
}

#[async_trait]
impl FamilyDetector for PodmanDetector {
    fn family(&self) -> RuntimeFamily {
        RuntimeFamily::Podman
    }

    async fn detect(&self, deadline: Instant) -> Result<Vec<Runtime>, DetectionError> {
        let socket = self
            .sockets
            .iter()
            .find(|path| is_socket(path))
            .ok_or_else(|| DetectionError::SocketNotFound {
                family: RuntimeFamily::Podman,
                searched: self.sockets.clone(),
            })?;

        let version = self
            .query_version(socket, deadline)
            .await
            .map_err(|reason| DetectionError::VersionQueryFailed {
                family: RuntimeFamily::Podman,
                socket: socket.clone(),
                reason,
            })?;

        tracing::debug!(socket = %socket.display(), %version, "found podman");

        Ok(vec![Runtime::new(RuntimeName::Podman, version, socket.clone())])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn deadline() -> Instant {
        Instant::now() + Duration::from_secs(10)
    }

    /// Serve one HTTP response on a fresh socket in `dir`.
    fn serve_once(dir: &Path, status_line: &'static str, body: &'static str) -> PathBuf {
        let path = dir.join("podman.sock");
        let listener = tokio::net::UnixListener::bind(&path).unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut buf = vec![0u8; 4096];
            let _ = stream.read(&mut buf).await.unwrap();
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.flush().await.unwrap();
        });
        path
    }

    #[test]
    fn test_default_sockets_rootless_first() {
        let sockets = default_sockets(Some(1000));
        assert_eq!(
            sockets,
            vec![
                PathBuf::from("/run/user/1000/podman/podman.sock"),
                PathBuf::from("/run/podman/podman.sock"),
            ]
        );
    }

    #[test]
    fn test_default_sockets_without_uid() {
        assert_eq!(
            default_sockets(None),
            vec![PathBuf::from("/run/podman/podman.sock")]
        );
    }

    #[tokio::test]
    async fn test_detect_reports_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = serve_once(
            dir.path(),
            "HTTP/1.1 200 OK",
            r#"{"Version":"4.9.3","ApiVersion":"1.41","Os":"linux"}"#,
        );

        let detector = PodmanDetector::new().with_sockets(vec![path.clone()]);
        let runtimes = detector.detect(deadline()).await.unwrap();

        assert_eq!(runtimes.len(), 1);
        assert_eq!(runtimes[0].name, RuntimeName::Podman);
        assert_eq!(runtimes[0].family, RuntimeFamily::Podman);
        assert_eq!(runtimes[0].version, "4.9.3");
        assert_eq!(runtimes[0].location, path);
        assert_eq!(runtimes[0].priority, crate::PRIORITY_PODMAN);
    }

    #[tokio::test]
    async fn test_detect_error_status_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = serve_once(
            dir.path(),
            "HTTP/1.1 500 Internal Server Error",
            r#"{"cause":"boom"}"#,
        );

        let detector = PodmanDetector::new().with_sockets(vec![path]);
        let err = detector.detect(deadline()).await.unwrap_err();
        match err {
            DetectionError::VersionQueryFailed { family, reason, .. } => {
                assert_eq!(family, RuntimeFamily::Podman);
                assert!(reason.contains("500"), "reason: {}", reason);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_detect_invalid_body_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = serve_once(dir.path(), "HTTP/1.1 200 OK", r#"{"ApiVersion":"1.41"}"#);

        let detector = PodmanDetector::new().with_sockets(vec![path]);
        let err = detector.detect(deadline()).await.unwrap_err();
        assert!(matches!(err, DetectionError::VersionQueryFailed { .. }));
    }

    #[tokio::test]
    async fn test_regular_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let regular = dir.path().join("podman.sock");
        std::fs::write(&regular, "test").unwrap();

        let detector = PodmanDetector::new().with_sockets(vec![regular.clone()]);
        let err = detector.detect(deadline()).await.unwrap_err();
        match err {
            DetectionError::SocketNotFound { family, searched } => {
                assert_eq!(family, RuntimeFamily::Podman);
                assert_eq!(searched, vec![regular]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stale_socket_fails_version_query() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("podman.sock");
        drop(std::os::unix::net::UnixListener::bind(&path).unwrap());

        let detector = PodmanDetector::new().with_sockets(vec![path]);
        let err = detector.detect(deadline()).await.unwrap_err();
        assert!(matches!(err, DetectionError::VersionQueryFailed { .. }));
    }

    #[tokio::test]
    async fn test_silent_socket_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("podman.sock");
        let _listener = std::os::unix::net::UnixListener::bind(&path).unwrap();

        let detector = PodmanDetector::new()
            .with_sockets(vec![path])
            .with_timeout(Duration::from_millis(200));
        let err = detector.detect(deadline()).await.unwrap_err();
        match err {
            DetectionError::VersionQueryFailed { reason, .. } => {
                assert_eq!(reason, "deadline exceeded");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
