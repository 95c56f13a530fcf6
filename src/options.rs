//! Detection options and override configuration.
//!
//! This module provides the [`DetectOptions`] struct for tuning detection
//! timeouts and the environment variable used to force a single runtime.

use std::time::Duration;

/// Environment variable naming the one runtime detection should consider.
///
/// Read once when a [`RuntimeDetector`](crate::RuntimeDetector) is built.
/// Valid values: `runc`, `crun`, `youki`, `containerd`, `crio`, `podman`,
/// `docker`. Empty or unset means no override.
pub const OVERRIDE_ENV_VAR: &str = "CONTAINER_RUNTIME";

/// Configuration options for runtime detection.
///
/// # Default Behavior
///
/// Binary version checks get 2 seconds, socket version queries get
/// 5 seconds, and a whole detection call is bounded by 10 seconds when the
/// caller does not pass its own deadline.
///
/// # Example
///
/// ```rust
/// use container_runtime_discovery::DetectOptions;
/// use std::time::Duration;
///
/// let opts = DetectOptions {
///     rpc_timeout: Duration::from_secs(1),
///     ..Default::default()
/// };
/// assert_eq!(opts.version_timeout, Duration::from_secs(2));
/// ```
#[derive(Debug, Clone)]
pub struct DetectOptions {
    /// Timeout for each `<binary> --version` execution.
    ///
    /// Default: 2 seconds
    pub version_timeout: Duration,

    /// Timeout for connecting to a runtime socket and querying its version.
    ///
    /// Default: 5 seconds
    pub rpc_timeout: Duration,

    /// Deadline budget used by `RuntimeDetector::detect`.
    ///
    /// Default: 10 seconds
    pub budget: Duration,
}

impl Default for DetectOptions {
    fn default() -> Self {
        Self {
            version_timeout: Duration::from_secs(2),
            rpc_timeout: Duration::from_secs(5),
            budget: Duration::from_secs(10),
        }
    }
}

/// Read the runtime override from [`OVERRIDE_ENV_VAR`].
///
/// Returns `None` if the variable is unset, not unicode, or empty after
/// trimming whitespace.
pub fn override_from_env() -> Option<String> {
    std::env::var(OVERRIDE_ENV_VAR)
        .ok()
        .and_then(|value| normalize_override(&value))
}

pub(crate) fn normalize_override(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = DetectOptions::default();
        assert_eq!(opts.version_timeout, Duration::from_secs(2));
        assert_eq!(opts.rpc_timeout, Duration::from_secs(5));
        assert_eq!(opts.budget, Duration::from_secs(10));
    }

    #[test]
    fn test_custom_timeout() {
        let opts = DetectOptions {
            version_timeout: Duration::from_millis(500),
            ..Default::default()
        };
        assert_eq!(opts.version_timeout, Duration::from_millis(500));
        assert_eq!(opts.rpc_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_override_not_set() {
        temp_env::with_var_unset(OVERRIDE_ENV_VAR, || {
            assert_eq!(override_from_env(), None);
        });
    }

    #[test]
    fn test_override_plain() {
        temp_env::with_var(OVERRIDE_ENV_VAR, Some("runc"), || {
            assert_eq!(override_from_env().as_deref(), Some("runc"));
        });
    }

    #[test]
    fn test_override_trimmed() {
        temp_env::with_var(OVERRIDE_ENV_VAR, Some("  containerd \n"), || {
            assert_eq!(override_from_env().as_deref(), Some("containerd"));
        });
    }

    #[test]
    fn test_override_blank_is_none() {
        temp_env::with_var(OVERRIDE_ENV_VAR, Some("   "), || {
            assert_eq!(override_from_env(), None);
        });
    }
}
