//! OCI runtime binary detector.

use super::FamilyDetector;
use crate::detection::{check_version, find_executable, parse_version};
use crate::{DetectOptions, DetectionError, Runtime, RuntimeFamily, RuntimeName};
use async_trait::async_trait;
use futures::future::join_all;
use std::ffi::OsString;
use std::time::Duration;
use tokio::time::Instant;

/// Binaries searched for, in tie-break order.
const OCI_CANDIDATES: [RuntimeName; 3] = [RuntimeName::Runc, RuntimeName::Crun, RuntimeName::Youki];

/// Finds low-level OCI runtimes (runc, crun, youki) on the search path.
///
/// Each binary found is asked for `--version`. A candidate that is missing,
/// hangs, fails, or prints no recognisable version is skipped; the detector
/// itself never fails.
///
/// # Example
///
/// ```rust,no_run
/// use container_runtime_discovery::{FamilyDetector, OciDetector};
/// use std::time::Duration;
/// use tokio::time::Instant;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let detector = OciDetector::new();
///     let deadline = Instant::now() + Duration::from_secs(5);
///     for rt in detector.detect(deadline).await.unwrap() {
///         println!("{} {} at {}", rt.name, rt.version, rt.location.display());
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct OciDetector {
    candidates: Vec<RuntimeName>,
    search_path: Option<OsString>,
    version_timeout: Duration,
}

impl OciDetector {
    /// Detector over `PATH` with default timeouts.
    pub fn new() -> Self {
        Self::with_options(&DetectOptions::default())
    }

    /// Detector over `PATH` using the timeouts in `options`.
    pub fn with_options(options: &DetectOptions) -> Self {
        Self {
            candidates: OCI_CANDIDATES.to_vec(),
            search_path: None,
            version_timeout: options.version_timeout,
        }
    }

    /// Search these directories (in `PATH` syntax) instead of `PATH`.
    pub fn with_search_path(mut self, search_path: impl Into<OsString>) -> Self {
        self.search_path = Some(search_path.into());
        self
    }

    /// Change the per-binary version check timeout.
    pub fn with_version_timeout(mut self, timeout: Duration) -> Self {
        self.version_timeout = timeout;
        self
    }

    /// Candidate names in the order they are reported.
    pub fn candidates(&self) -> &[RuntimeName] {
        &self.candidates
    }

    async fn probe(&self, name: RuntimeName, deadline: Instant) -> Option<Runtime> {
        let path = find_executable(name.as_str(), self.search_path.as_deref())?;
        let limit = self
            .version_timeout
            .min(deadline.saturating_duration_since(Instant::now()));

        let probed = check_version(&path, limit)
            .await
            .and_then(|output| parse_version(&output));

        match probed {
            Ok(version) => {
                tracing::debug!(runtime = %name, path = %path.display(), %version, "found OCI runtime");
                Some(Runtime::new(name, version, path))
            }
            Err(e) => {
                tracing::debug!(
                    runtime = %name,
                    path = %path.display(),
                    "skipping OCI runtime: {}",
                    e.description()
                );
                None
            }
        }
    }
}

impl Default for OciDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FamilyDetector for OciDetector {
    fn family(&self) -> RuntimeFamily {
        RuntimeFamily::Oci
    }

    async fn detect(&self, deadline: Instant) -> Result<Vec<Runtime>, DetectionError> {
        let probes = self
            .candidates
            .iter()
            .map(|name| self.probe(*name, deadline));

        Ok(join_all(probes).await.into_iter().flatten().collect())
    }
}
