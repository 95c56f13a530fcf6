//! Async version check with timeout.

use crate::error::ProbeError;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Run `<path> --version` and return its standard output.
///
/// The child is killed if it does not exit within `limit`.
///
/// # Returns
///
/// `Ok(String)` with the captured stdout, or a `ProbeError`:
/// - `Timeout` if the command takes longer than `limit`
/// - `PermissionDenied` if the executable cannot be run due to permissions
/// - `IoError` for other spawn or wait failures
/// - `NonZeroExit` if the command reports failure
/// - `VersionParseFailed` if output is not valid UTF-8
pub(crate) async fn check_version(path: &Path, limit: Duration) -> Result<String, ProbeError> {
    let output = timeout(
        limit,
        Command::new(path)
            .arg("--version")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output(),
    )
    .await
    .map_err(|_| ProbeError::Timeout)?
    .map_err(|e| {
        if e.kind() == std::io::ErrorKind::PermissionDenied {
            ProbeError::PermissionDenied
        } else {
            ProbeError::IoError
        }
    })?;

    if !output.status.success() {
        return Err(ProbeError::NonZeroExit);
    }

    String::from_utf8(output.stdout).map_err(|_| ProbeError::VersionParseFailed)
}
