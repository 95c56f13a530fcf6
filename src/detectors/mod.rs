//! Family detectors.
//!
//! Each runtime family has one detection strategy behind the shared
//! [`FamilyDetector`] trait. The orchestrator only sees the trait, so tests
//! and embedders can substitute their own implementations.

mod cri;
mod oci;
mod podman;

pub use cri::{CriDetector, SocketCandidate};
pub use oci::OciDetector;
pub use podman::PodmanDetector;

use crate::{DetectionError, Runtime, RuntimeFamily};
use async_trait::async_trait;
use tokio::time::Instant;

/// A detection strategy for one runtime family.
///
/// `detect` must not modify the host. It returns every runtime of the family
/// it found, in a fixed order, or a family-level failure. Finding nothing is
/// `Ok(vec![])`, not an error.
#[async_trait]
pub trait FamilyDetector: Send + Sync {
    /// The family this detector reports.
    fn family(&self) -> RuntimeFamily;

    /// Probe the host. Network and process work must finish by `deadline`.
    async fn detect(&self, deadline: Instant) -> Result<Vec<Runtime>, DetectionError>;
}

/// The earlier of `deadline` and `timeout` from now.
pub(crate) fn bounded(deadline: Instant, timeout: std::time::Duration) -> Instant {
    deadline.min(Instant::now() + timeout)
}
