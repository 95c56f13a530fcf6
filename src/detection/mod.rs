//! Host probing primitives shared by the family detectors.
//!
//! - `find_executable`: search-path lookup of a candidate binary
//! - `check_version`: `--version` execution with a timeout
//! - `parse_version`: version token extraction from `--version` output
//! - `parse_semver`: best-effort semantic version from an opaque string
//! - `is_socket`: socket-type check on a filesystem path

mod parser;
mod path_finder;
mod socket;
mod version;

pub(crate) use parser::{parse_semver, parse_version};
pub(crate) use path_finder::find_executable;
pub(crate) use socket::{current_uid, is_socket};
pub(crate) use version::check_version;
