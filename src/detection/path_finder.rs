//! Search-path lookup of runtime executables.

use std::ffi::OsStr;
use std::path::PathBuf;

/// Find an executable by name.
///
/// When `search_path` is `None` the process `PATH` is used. A name present
/// in several directories resolves to the first one, as a shell would.
///
/// # Returns
///
/// `Some(PathBuf)` if the executable is found, `None` otherwise.
pub(crate) fn find_executable(name: &str, search_path: Option<&OsStr>) -> Option<PathBuf> {
    match search_path {
        Some(paths) => {
            let cwd = std::env::current_dir().unwrap_or_default();
            which::which_in(name, Some(paths), cwd).ok()
        }
        None => which::which(name).ok(),
    }
}
