//! # container-runtime-discovery
//!
//! Container runtime discovery for OCI binaries, CRI daemons and Podman.
//!
//! This crate finds which container runtimes are available on a Unix host
//! and picks one to use, without depending on any single vendor. It never
//! modifies the host: binaries are only asked for `--version` and sockets
//! only for their version.
//!
//! ## Features
//!
//! - `OciDetector` for `runc`, `crun` and `youki` on the search path
//! - `CriDetector` for containerd and CRI-O over the CRI gRPC socket
//! - `PodmanDetector` for the Podman API socket
//! - `RuntimeDetector` combining families by priority, tolerating partial
//!   failure, and honouring the `CONTAINER_RUNTIME` override
//! - `detect()` async function using every built-in family
//!
//! ## Example
//!
//! ```rust,no_run
//! use container_runtime_discovery::detect;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     match detect().await {
//!         Ok(result) => {
//!             match result.selected() {
//!                 Some(rt) => println!("selected {} {} at {:?}", rt.name, rt.version, rt.location),
//!                 None => println!("no container runtime found"),
//!             }
//!             for warning in result.warnings() {
//!                 println!("partial detection: {}", warning);
//!             }
//!         }
//!         Err(e) => println!("detection failed: {}", e),
//!     }
//! }
//! ```

mod detect;
mod detection;
mod detectors;
mod error;
mod options;
mod runtime;
mod runtime_name;

pub use detect::{detect, RuntimeDetector, RuntimeDetectorBuilder};
pub use detectors::{CriDetector, FamilyDetector, OciDetector, PodmanDetector, SocketCandidate};
pub use error::DetectionError;
pub use options::{override_from_env, DetectOptions, OVERRIDE_ENV_VAR};
pub use runtime::{sort_by_priority, DetectionResult, Runtime};
pub use runtime_name::{
    RuntimeFamily, RuntimeName, PRIORITY_CRI, PRIORITY_DOCKER, PRIORITY_OCI, PRIORITY_PODMAN,
};
