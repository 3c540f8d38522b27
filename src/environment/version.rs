//! Version strings: parsing, normalization and comparison.

use regex::Regex;
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::sync::LazyLock;

/// Text shown wherever a probed value could not be determined.
pub const UNKNOWN: &str = "unknown";

static VERSION_TRIPLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)\.(\d+)\.(\d+)").expect("valid version regex"));

/// Interpreter version triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RuntimeVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl RuntimeVersion {
    /// Create a version triple.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Extract the first `X.Y.Z` triple from arbitrary tool output.
    ///
    /// Accepts both `3.12.1` and `Python 3.12.1`.
    pub fn parse(text: &str) -> Option<Self> {
        let caps = VERSION_TRIPLE.captures(text)?;
        Some(Self {
            major: caps[1].parse().ok()?,
            minor: caps[2].parse().ok()?,
            patch: caps[3].parse().ok()?,
        })
    }

    /// `major.minor`, as used in interpreter directory names.
    pub fn short(&self) -> String {
        format!("{}.{}", self.major, self.minor)
    }
}

impl fmt::Display for RuntimeVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Trim a four-component version to its first three components.
///
/// Package indexes publish rebuilds as `6.6.2.1`; the toolchain bundle for
/// that release is `6.6.2`. Any other shape is returned unchanged, so the
/// function is idempotent.
pub fn normalize_version(version: &str) -> String {
    let parts: Vec<&str> = version.trim().split('.').collect();
    if parts.len() == 4 {
        parts[..3].join(".")
    } else {
        version.trim().to_string()
    }
}

/// Parse a dotted numeric version into its components.
pub fn parse_version(version: &str) -> Option<Vec<u64>> {
    let trimmed = version.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.split('.').map(|p| p.parse().ok()).collect()
}

/// Compare two dotted versions, padding the shorter one with zeros.
///
/// Returns `None` if either side is not a dotted numeric version.
pub fn compare_versions(a: &str, b: &str) -> Option<Ordering> {
    let a = parse_version(a)?;
    let b = parse_version(b)?;
    let len = a.len().max(b.len());

    for i in 0..len {
        let l = a.get(i).copied().unwrap_or(0);
        let r = b.get(i).copied().unwrap_or(0);
        match l.cmp(&r) {
            Ordering::Equal => continue,
            other => return Some(other),
        }
    }
    Some(Ordering::Equal)
}

/// Whether `version` is at least `minimum`. Unparseable versions never are.
pub fn version_at_least(version: &str, minimum: &str) -> bool {
    matches!(
        compare_versions(version, minimum),
        Some(Ordering::Greater | Ordering::Equal)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_fourth_component() {
        assert_eq!(normalize_version("6.6.2.1"), "6.6.2");
    }

    #[test]
    fn normalize_keeps_three_components() {
        assert_eq!(normalize_version("6.7.2"), "6.7.2");
    }

    #[test]
    fn normalize_is_idempotent() {
        for v in ["6.6.2.1", "6.6.2", "6.8", "1.2.3.4.5"] {
            let once = normalize_version(v);
            assert_eq!(normalize_version(&once), once);
        }
    }

    #[test]
    fn normalize_leaves_other_shapes_alone() {
        assert_eq!(normalize_version("6.8"), "6.8");
        assert_eq!(normalize_version("1.2.3.4.5"), "1.2.3.4.5");
    }

    #[test]
    fn runtime_version_parses_plain_and_prefixed() {
        assert_eq!(
            RuntimeVersion::parse("3.12.1"),
            Some(RuntimeVersion::new(3, 12, 1))
        );
        assert_eq!(
            RuntimeVersion::parse("Python 3.13.0\n"),
            Some(RuntimeVersion::new(3, 13, 0))
        );
        assert_eq!(RuntimeVersion::parse("no version here"), None);
    }

    #[test]
    fn runtime_version_display_and_short() {
        let v = RuntimeVersion::new(3, 12, 4);
        assert_eq!(v.to_string(), "3.12.4");
        assert_eq!(v.short(), "3.12");
    }

    #[test]
    fn parse_version_rejects_garbage() {
        assert_eq!(parse_version("6.6.0"), Some(vec![6, 6, 0]));
        assert_eq!(parse_version(""), None);
        assert_eq!(parse_version("6.x"), None);
    }

    #[test]
    fn compare_pads_missing_components() {
        assert_eq!(compare_versions("6.6", "6.6.0"), Some(Ordering::Equal));
        assert_eq!(compare_versions("6.10.0", "6.9.9"), Some(Ordering::Greater));
        assert_eq!(compare_versions("6.5.3", "6.6.0"), Some(Ordering::Less));
    }

    #[test]
    fn version_at_least_threshold() {
        assert!(version_at_least("6.6.0", "6.6.0"));
        assert!(version_at_least("6.8.1", "6.6.0"));
        assert!(!version_at_least("6.5.3", "6.6.0"));
        assert!(!version_at_least("unknown", "6.6.0"));
    }
}
