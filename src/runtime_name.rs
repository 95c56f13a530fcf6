//! Runtime name and family enums identifying supported container runtimes.

use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

/// Priority class of CRI socket runtimes (containerd, CRI-O).
pub const PRIORITY_CRI: i32 = 100;
/// Priority class of direct OCI runtime binaries (runc, crun, youki).
pub const PRIORITY_OCI: i32 = 70;
/// Priority class of the Podman socket runtime.
pub const PRIORITY_PODMAN: i32 = 50;
/// Priority class reserved for Docker.
pub const PRIORITY_DOCKER: i32 = 30;

/// The category of a container runtime.
///
/// Every family shares one detection strategy. Docker is kept as a
/// reserved family: the name is recognised but never detected.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RuntimeFamily {
    /// Low-level OCI runtime binaries found on the search path.
    Oci,
    /// Container Runtime Interface daemons reached over a Unix socket.
    Cri,
    /// Podman service reached over its API socket.
    Podman,
    /// Docker, recognised for compatibility but not supported.
    Docker,
}

impl RuntimeFamily {
    /// Fixed priority class of this family. Higher is preferred.
    ///
    /// ```rust
    /// use container_runtime_discovery::RuntimeFamily;
    ///
    /// assert!(RuntimeFamily::Cri.priority() > RuntimeFamily::Oci.priority());
    /// ```
    pub fn priority(&self) -> i32 {
        match self {
            Self::Cri => PRIORITY_CRI,
            Self::Oci => PRIORITY_OCI,
            Self::Podman => PRIORITY_PODMAN,
            Self::Docker => PRIORITY_DOCKER,
        }
    }

    /// Whether any detector implements this family.
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Docker)
    }
}

/// The identifier of a container runtime.
///
/// This is the closed set of values accepted by the runtime override. The
/// string form is the lowercase identifier used on the command line and in
/// the `CONTAINER_RUNTIME` environment variable.
///
/// # Example
///
/// ```rust
/// use container_runtime_discovery::{RuntimeFamily, RuntimeName};
///
/// let name: RuntimeName = "crun".parse().unwrap();
/// assert_eq!(name, RuntimeName::Crun);
/// assert_eq!(name.family(), RuntimeFamily::Oci);
/// assert_eq!(name.to_string(), "crun");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RuntimeName {
    Runc,
    Crun,
    Youki,
    Containerd,
    Crio,
    Podman,
    Docker,
}

impl RuntimeName {
    /// The family whose detector is able to report this runtime.
    pub fn family(&self) -> RuntimeFamily {
        match self {
            Self::Runc | Self::Crun | Self::Youki => RuntimeFamily::Oci,
            Self::Containerd | Self::Crio => RuntimeFamily::Cri,
            Self::Podman => RuntimeFamily::Podman,
            Self::Docker => RuntimeFamily::Docker,
        }
    }

    /// The executable or identifier string, e.g. `"runc"`.
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    /// Iterator over every recognised runtime name.
    ///
    /// ```rust
    /// use container_runtime_discovery::RuntimeName;
    ///
    /// assert_eq!(RuntimeName::all().count(), 7);
    /// ```
    pub fn all() -> impl Iterator<Item = Self> {
        <Self as IntoEnumIterator>::iter()
    }

    /// Comma separated list of every recognised name, for error messages.
    pub(crate) fn valid_values() -> String {
        Self::all()
            .map(|name| name.as_str().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
