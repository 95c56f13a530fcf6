//! Runtime detection across families.

use crate::detectors::{CriDetector, FamilyDetector, OciDetector, PodmanDetector};
use crate::options::{normalize_override, override_from_env};
use crate::runtime::sort_by_priority;
use crate::{DetectOptions, DetectionError, DetectionResult, Runtime, RuntimeFamily, RuntimeName};
use futures::future::join_all;
use std::time::Duration;
use tokio::time::Instant;

/// Orchestrates detection over the configured family detectors.
///
/// A detector holds at most one detector per family. Families are always
/// consulted in the order OCI, CRI, Podman; this order breaks priority ties.
///
/// The runtime override is captured when the detector is built, from
/// [`OVERRIDE_ENV_VAR`](crate::OVERRIDE_ENV_VAR) unless set explicitly.
/// When present, only the overridden runtime is looked for.
///
/// # Example
///
/// ```rust,no_run
/// use container_runtime_discovery::{OciDetector, RuntimeDetector};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let detector = RuntimeDetector::builder()
///         .oci(OciDetector::new())
///         .without_override()
///         .build();
///
///     match detector.detect().await {
///         Ok(result) => {
///             if let Some(rt) = result.selected() {
///                 println!("using {} {}", rt.name, rt.version);
///             }
///             for warning in result.warnings() {
///                 eprintln!("warning: {}", warning);
///             }
///         }
///         Err(e) => eprintln!("no usable runtime: {}", e),
///     }
/// }
/// ```
pub struct RuntimeDetector {
    oci: Option<Box<dyn FamilyDetector>>,
    cri: Option<Box<dyn FamilyDetector>>,
    podman: Option<Box<dyn FamilyDetector>>,
    override_value: Option<String>,
    budget: Duration,
}

impl RuntimeDetector {
    /// Detector with every built-in family and default options.
    ///
    /// Reads the override from the environment.
    pub fn new() -> Self {
        Self::with_options(DetectOptions::default())
    }

    /// Detector with every built-in family configured from `options`.
    pub fn with_options(options: DetectOptions) -> Self {
        Self::builder()
            .oci(OciDetector::with_options(&options))
            .cri(CriDetector::with_options(&options))
            .podman(PodmanDetector::with_options(&options))
            .options(options)
            .build()
    }

    /// Start a detector with no families configured.
    pub fn builder() -> RuntimeDetectorBuilder {
        RuntimeDetectorBuilder::default()
    }

    /// The override captured at construction, if any.
    pub fn override_value(&self) -> Option<&str> {
        self.override_value.as_deref()
    }

    /// Detect runtimes, bounded by the configured budget.
    pub async fn detect(&self) -> Result<DetectionResult, DetectionError> {
        self.detect_until(Instant::now() + self.budget).await
    }

    /// Detect runtimes, with all socket and process work ending by `deadline`.
    ///
    /// Without an override every configured family runs. A family that fails
    /// becomes a warning on the result; the call only fails when nothing was
    /// found and at least one family failed, in which case the first failure
    /// is returned.
    ///
    /// With an override, only the overridden runtime's family runs and the
    /// call fails unless that runtime is found.
    pub async fn detect_until(&self, deadline: Instant) -> Result<DetectionResult, DetectionError> {
        match self.override_value.as_deref() {
            Some(value) => self.detect_override(value, deadline).await,
            None => self.detect_all(deadline).await,
        }
    }

    fn slot(&self, family: RuntimeFamily) -> Option<&dyn FamilyDetector> {
        let slot = match family {
            RuntimeFamily::Oci => &self.oci,
            RuntimeFamily::Cri => &self.cri,
            RuntimeFamily::Podman => &self.podman,
            RuntimeFamily::Docker => return None,
        };
        slot.as_deref()
    }

    fn configured(&self) -> impl Iterator<Item = &dyn FamilyDetector> {
        [&self.oci, &self.cri, &self.podman]
            .into_iter()
            .filter_map(|slot| slot.as_deref())
    }

    async fn detect_all(&self, deadline: Instant) -> Result<DetectionResult, DetectionError> {
        let outcomes = join_all(self.configured().map(|detector| async move {
            (detector.family(), detector.detect(deadline).await)
        }))
        .await;

        let (mut runtimes, warnings) = outcomes.into_iter().fold(
            (Vec::<Runtime>::new(), Vec::<DetectionError>::new()),
            |(mut runtimes, mut warnings), (family, outcome)| {
                match outcome {
                    Ok(found) => runtimes.extend(found),
                    Err(e) => {
                        tracing::warn!(%family, "runtime detection failed: {}", e);
                        warnings.push(e);
                    }
                }
                (runtimes, warnings)
            },
        );

        if runtimes.is_empty() {
            if let Some(first) = warnings.into_iter().next() {
                return Err(first);
            }
            return Ok(DetectionResult::new(Vec::new(), Vec::new()));
        }

        sort_by_priority(&mut runtimes);
        Ok(DetectionResult::new(runtimes, warnings))
    }

    async fn detect_override(
        &self,
        value: &str,
        deadline: Instant,
    ) -> Result<DetectionResult, DetectionError> {
        let name: RuntimeName = value.parse().map_err(|_| DetectionError::InvalidOverride {
            value: value.to_string(),
        })?;

        let family = name.family();
        if !family.is_supported() {
            return Err(DetectionError::Unsupported { name });
        }

        let detector = self
            .slot(family)
            .ok_or(DetectionError::DetectorNotConfigured { name, family })?;

        tracing::debug!(runtime = %name, %family, "detecting overridden runtime");

        let found = detector
            .detect(deadline)
            .await
            .map_err(|source| DetectionError::OverrideFailed {
                name,
                source: Box::new(source),
            })?;

        let matches: Vec<Runtime> = found.into_iter().filter(|rt| rt.name == name).collect();
        if matches.is_empty() {
            return Err(DetectionError::RuntimeNotFound { name });
        }

        Ok(DetectionResult::new(matches, Vec::new()))
    }
}

impl Default for RuntimeDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`RuntimeDetector`].
///
/// Families that are not given a detector are skipped in normal detection
/// and reported as [`DetectionError::DetectorNotConfigured`] when overridden.
#[derive(Default)]
pub struct RuntimeDetectorBuilder {
    oci: Option<Box<dyn FamilyDetector>>,
    cri: Option<Box<dyn FamilyDetector>>,
    podman: Option<Box<dyn FamilyDetector>>,
    override_value: Option<Option<String>>,
    options: DetectOptions,
}

impl RuntimeDetectorBuilder {
    /// Detector for OCI runtime binaries.
    pub fn oci(mut self, detector: impl FamilyDetector + 'static) -> Self {
        self.oci = Some(Box::new(detector));
        self
    }

    /// Detector for CRI socket runtimes.
    pub fn cri(mut self, detector: impl FamilyDetector + 'static) -> Self {
        self.cri = Some(Box::new(detector));
        self
    }

    /// Detector for Podman.
    pub fn podman(mut self, detector: impl FamilyDetector + 'static) -> Self {
        self.podman = Some(Box::new(detector));
        self
    }

    /// Use this override instead of reading the environment.
    ///
    /// The value is trimmed; a blank value means no override.
    pub fn override_value(mut self, value: impl AsRef<str>) -> Self {
        self.override_value = Some(normalize_override(value.as_ref()));
        self
    }

    /// Ignore the environment and detect every configured family.
    pub fn without_override(mut self) -> Self {
        self.override_value = Some(None);
        self
    }

    /// Options for the detection budget.
    pub fn options(mut self, options: DetectOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the detector, reading the override from the environment unless
    /// one was set explicitly.
    pub fn build(self) -> RuntimeDetector {
        RuntimeDetector {
            oci: self.oci,
            cri: self.cri,
            podman: self.podman,
            override_value: self.override_value.unwrap_or_else(override_from_env),
            budget: self.options.budget,
        }
    }
}

/// Detect runtimes with every built-in family and default options.
///
/// Shorthand for `RuntimeDetector::new().detect()`.
///
/// # Example
///
/// ```rust,no_run
/// use container_runtime_discovery::detect;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     if let Ok(result) = detect().await {
///         for rt in result.runtimes() {
///             println!("{} {} (priority {})", rt.name, rt.version, rt.priority);
///         }
///     }
/// }
/// ```
pub async fn detect() -> Result<DetectionResult, DetectionError> {
    RuntimeDetector::new().detect().await
}
