//! Socket path checks.

use std::os::unix::fs::FileTypeExt;
use std::path::Path;

/// Whether `path` exists and is a socket special file.
///
/// Symlinks are followed. Regular files, directories and dangling links are
/// all reported as `false`.
pub(crate) fn is_socket(path: &Path) -> bool {
    std::fs::metadata(path)
        .map(|meta| meta.file_type().is_socket())
        .unwrap_or(false)
}

/// The real user id of this process, used to locate per-user sockets.
pub(crate) fn current_uid() -> Option<u32> {
    std::fs::read_to_string("/proc/self/status")
        .ok()
        .and_then(|status| {
            status
                .lines()
                .find(|line| line.starts_with("Uid:"))
                .and_then(|line| line.split_whitespace().nth(1))
                .and_then(|uid| uid.parse().ok())
        })
        .or_else(|| std::env::var("UID").ok().and_then(|uid| uid.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::net::UnixListener;

    #[test]
    fn test_live_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runtime.sock");
        let _listener = UnixListener::bind(&path).unwrap();

        assert!(is_socket(&path));
    }

    #[test]
    fn test_regular_file_is_not_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not-a-socket");
        std::fs::write(&path, "test").unwrap();

        assert!(!is_socket(&path));
    }

    #[test]
    fn test_directory_is_not_socket() {
        let dir = tempfile::tempdir().unwrap();
        assert!(!is_socket(dir.path()));
    }

    #[test]
    fn test_missing_path_is_not_socket() {
        assert!(!is_socket(Path::new("/nonexistent/path/runtime.sock")));
    }

    #[test]
    fn test_symlink_to_socket() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("real.sock");
        let link = dir.path().join("link.sock");
        let _listener = UnixListener::bind(&path).unwrap();
        std::os::unix::fs::symlink(&path, &link).unwrap();

        assert!(is_socket(&link));
    }
}
