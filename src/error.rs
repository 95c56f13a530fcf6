//! Error types for runtime detection.

use crate::{RuntimeFamily, RuntimeName};
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by detectors and by [`RuntimeDetector::detect`].
///
/// In normal detection a family failure is recorded as a warning on the
/// [`DetectionResult`] and only becomes the returned error when no family
/// produced a runtime. Override errors are always returned directly.
///
/// [`RuntimeDetector::detect`]: crate::RuntimeDetector::detect
/// [`DetectionResult`]: crate::DetectionResult
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DetectionError {
    /// None of the family's well-known socket paths is a live socket file.
    #[error("{family} socket not found (searched: {})", display_paths(.searched))]
    SocketNotFound {
        /// Family whose sockets were searched.
        family: RuntimeFamily,
        /// Paths that were checked, in order.
        searched: Vec<PathBuf>,
    },

    /// A socket was found but the runtime did not answer the version query.
    #[error("failed to get {family} version from {}: {reason}", .socket.display())]
    VersionQueryFailed {
        /// Family of the queried runtime.
        family: RuntimeFamily,
        /// Socket that was queried.
        socket: PathBuf,
        /// Connection, protocol or deadline failure.
        reason: String,
    },

    /// A pluggable detector failed for a reason of its own.
    #[error("{family} detection failed: {message}")]
    DetectorFailed {
        /// Family of the failing detector.
        family: RuntimeFamily,
        /// Description of the failure.
        message: String,
    },

    /// The override does not name a known runtime.
    #[error(
        "invalid runtime override value: {value:?} (valid: {})",
        RuntimeName::valid_values()
    )]
    InvalidOverride {
        /// The rejected value.
        value: String,
    },

    /// The override names a runtime whose family has no implementation.
    #[error("{name} runtime not yet supported")]
    Unsupported {
        /// The requested runtime.
        name: RuntimeName,
    },

    /// The override requires a detector that was not supplied.
    #[error("runtime override {name} requires the {family} detector, which is not configured")]
    DetectorNotConfigured {
        /// The requested runtime.
        name: RuntimeName,
        /// The family whose detector is missing.
        family: RuntimeFamily,
    },

    /// The detector for the overridden runtime failed.
    #[error("failed to detect runtime {name}: {source}")]
    OverrideFailed {
        /// The requested runtime.
        name: RuntimeName,
        /// The detector failure.
        #[source]
        source: Box<DetectionError>,
    },

    /// The detector ran but did not report the overridden runtime.
    #[error("runtime {name} not found on system")]
    RuntimeNotFound {
        /// The requested runtime.
        name: RuntimeName,
    },
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Why a single binary candidate was skipped.
///
/// These never leave the binary detector: a candidate that fails to probe is
/// logged and skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ProbeError {
    /// The version command did not finish in time.
    Timeout,

    /// The executable could not be run due to permissions.
    PermissionDenied,

    /// The version command exited with a non-zero status.
    NonZeroExit,

    /// The output had no token after the `version` keyword, or was not UTF-8.
    VersionParseFailed,

    /// Spawning or waiting on the process failed.
    IoError,
}

impl ProbeError {
    /// Human-readable description of the error.
    pub(crate) fn description(&self) -> &'static str {
        match self {
            Self::Timeout => "Version check timed out",
            Self::PermissionDenied => "Permission denied",
            Self::NonZeroExit => "Version command exited with an error",
            Self::VersionParseFailed => "Failed to parse version",
            Self::IoError => "I/O error during version check",
        }
    }
}
