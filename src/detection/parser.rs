//! Version output parsing.

use crate::error::ProbeError;
use regex::Regex;
use semver::Version;
use std::sync::OnceLock;

/// Extract the version token from `--version` output.
///
/// OCI runtimes print `<name> version <version> ...`. The token following the
/// first case-insensitive `version` word is returned:
///
/// - `runc version 1.1.12\ncommit: v1.1.12-0-g51d5e94` -> `1.1.12`
/// - `runtime Version 1.2.3` -> `1.2.3`
///
/// # Returns
///
/// `Err(ProbeError::VersionParseFailed)` if the keyword is missing or is the
/// last word of the output.
pub(crate) fn parse_version(output: &str) -> Result<String, ProbeError> {
    let mut fields = output.split_whitespace();
    fields
        .by_ref()
        .find(|field| field.eq_ignore_ascii_case("version"))
        .and_then(|_| fields.next())
        .map(str::to_string)
        .ok_or(ProbeError::VersionParseFailed)
}

fn semver_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("Invalid regex pattern"))
}

/// Parse a semantic version out of an opaque version string.
///
/// Only the first `major.minor.patch` triple is used, so `v1.7.13` and
/// `1.2.3-rc1+git.abcdef` both parse.
pub(crate) fn parse_semver(version: &str) -> Option<Version> {
    let caps = semver_pattern().captures(version)?;
    Version::parse(caps.get(0)?.as_str()).ok()
}
