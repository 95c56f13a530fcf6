//! Detected runtime records and detection results.

use crate::detection::parse_semver;
use crate::{DetectionError, RuntimeFamily, RuntimeName};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A container runtime found on the host.
///
/// Instances are plain values produced by a single detection call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runtime {
    /// Runtime identifier.
    pub name: RuntimeName,

    /// Family whose detector reported this runtime.
    pub family: RuntimeFamily,

    /// Version string as reported by the runtime.
    ///
    /// This is kept verbatim (e.g. `1.1.12`, `v1.7.13`, `1.2.3-rc1+git.abc`).
    /// Use [`Runtime::semantic_version`] for a parsed form.
    pub version: String,

    /// Executable path for binaries, socket path for daemons.
    pub location: PathBuf,

    /// Selection priority. Higher values are preferred.
    pub priority: i32,
}

impl Runtime {
    /// Create a runtime record with the family and priority implied by `name`.
    ///
    /// ```rust
    /// use container_runtime_discovery::{Runtime, RuntimeFamily, RuntimeName};
    ///
    /// let rt = Runtime::new(RuntimeName::Runc, "1.1.12", "/usr/bin/runc");
    /// assert_eq!(rt.family, RuntimeFamily::Oci);
    /// assert_eq!(rt.priority, 70);
    /// ```
    pub fn new(
        name: RuntimeName,
        version: impl Into<String>,
        location: impl Into<PathBuf>,
    ) -> Self {
        let family = name.family();
        Self {
            name,
            family,
            version: version.into(),
            location: location.into(),
            priority: family.priority(),
        }
    }

    /// Return the same record with a different priority.
    pub fn with_priority(self, priority: i32) -> Self {
        Self { priority, ..self }
    }

    /// Best-effort semantic version extracted from [`Runtime::version`].
    ///
    /// Returns `None` when the version string carries no `major.minor.patch`
    /// triple.
    ///
    /// ```rust
    /// use container_runtime_discovery::{Runtime, RuntimeName};
    ///
    /// let rt = Runtime::new(RuntimeName::Containerd, "v1.7.13", "/run/containerd/containerd.sock");
    /// assert_eq!(rt.semantic_version(), Some(semver::Version::new(1, 7, 13)));
    /// ```
    pub fn semantic_version(&self) -> Option<Version> {
        parse_semver(&self.version)
    }
}

/// Sort runtimes by descending priority.
///
/// The sort is stable: runtimes with equal priority keep the order in which
/// they were detected.
pub fn sort_by_priority(runtimes: &mut [Runtime]) {
    runtimes.sort_by(|a, b| b.priority.cmp(&a.priority));
}

/// Outcome of a successful detection call.
///
/// `runtimes` is ordered by descending priority and the selected runtime is
/// always its first element. `warnings` lists the families that failed while
/// others still produced results; callers should inspect it even on success
/// to learn about degraded coverage.
#[derive(Debug)]
pub struct DetectionResult {
    runtimes: Vec<Runtime>,
    warnings: Vec<DetectionError>,
}

impl DetectionResult {
    /// `runtimes` must already be in selection order.
    pub(crate) fn new(runtimes: Vec<Runtime>, warnings: Vec<DetectionError>) -> Self {
        Self { runtimes, warnings }
    }

    /// All detected runtimes, highest priority first.
    pub fn runtimes(&self) -> &[Runtime] {
        &self.runtimes
    }

    /// The runtime to use, or `None` if nothing was found.
    pub fn selected(&self) -> Option<&Runtime> {
        self.runtimes.first()
    }

    /// Failures of individual families that did not abort detection.
    pub fn warnings(&self) -> &[DetectionError] {
        &self.warnings
    }

    /// Whether any family failed during this detection.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Whether no runtime was found.
    pub fn is_empty(&self) -> bool {
        self.runtimes.is_empty()
    }

    /// Consume the result, keeping only the runtimes.
    pub fn into_runtimes(self) -> Vec<Runtime> {
        self.runtimes
    }
}
