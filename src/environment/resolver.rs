//! Toolchain version resolution.
//!
//! Resolves the toolchain bundle version using the priority chain:
//! 1. The version of the already-installed toolchain package (normalized)
//! 2. A default keyed by the interpreter's minor version
//! 3. The baseline version, for unknown or unrecognized interpreters

use serde::Serialize;
use std::fmt;

use super::version::{normalize_version, parse_version, RuntimeVersion};

/// Version used when nothing better is known.
pub const BASELINE_TOOLCHAIN_VERSION: &str = "6.5.3";

/// Default toolchain version per interpreter minor version.
const DEFAULTS_BY_MINOR: &[(u32, &str)] = &[
    (12, "6.6.2"),
    (13, "6.7.2"),
    (14, "6.7.2"),
    (15, "6.8.1"),
];

/// How the toolchain version was determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionSource {
    /// Taken from the installed toolchain package.
    Installed,
    /// Looked up from the interpreter's minor version.
    RuntimeDefault,
    /// Nothing matched; the baseline was used.
    Baseline,
}

impl fmt::Display for VersionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Installed => write!(f, "installed package"),
            Self::RuntimeDefault => write!(f, "interpreter default"),
            Self::Baseline => write!(f, "baseline"),
        }
    }
}

/// A resolved toolchain version and how it was determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolchainVersion {
    /// Dotted version, always numeric.
    pub version: String,
    /// How this version was determined.
    pub source: VersionSource,
}

impl fmt::Display for ToolchainVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.version)
    }
}

/// Default toolchain version for an interpreter minor version.
pub fn default_for_minor(minor: u32) -> Option<&'static str> {
    DEFAULTS_BY_MINOR
        .iter()
        .find(|(m, _)| *m == minor)
        .map(|(_, v)| *v)
}

impl ToolchainVersion {
    /// Resolve the toolchain version.
    ///
    /// An installed version that isn't dotted-numeric is treated as absent.
    ///
    /// # Example
    ///
    /// ```
    /// use bindup::environment::{RuntimeVersion, ToolchainVersion, VersionSource};
    ///
    /// let runtime = RuntimeVersion::new(3, 12, 3);
    /// let resolved = ToolchainVersion::resolve(None, Some(&runtime));
    /// assert_eq!(resolved.version, "6.6.2");
    /// assert_eq!(resolved.source, VersionSource::RuntimeDefault);
    /// ```
    pub fn resolve(installed: Option<&str>, runtime: Option<&RuntimeVersion>) -> Self {
        if let Some(installed) = installed {
            let normalized = normalize_version(installed);
            if parse_version(&normalized).is_some() {
                return Self {
                    version: normalized,
                    source: VersionSource::Installed,
                };
            }
            tracing::debug!("ignoring unparseable installed version '{}'", installed);
        }

        match runtime.and_then(|r| default_for_minor(r.minor)) {
            Some(version) => Self {
                version: version.to_string(),
                source: VersionSource::RuntimeDefault,
            },
            None => Self {
                version: BASELINE_TOOLCHAIN_VERSION.to_string(),
                source: VersionSource::Baseline,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn py(minor: u32) -> RuntimeVersion {
        RuntimeVersion::new(3, minor, 0)
    }

    #[test]
    fn installed_version_wins_and_is_normalized() {
        let resolved = ToolchainVersion::resolve(Some("6.7.3.1"), Some(&py(12)));
        assert_eq!(resolved.version, "6.7.3");
        assert_eq!(resolved.source, VersionSource::Installed);
    }

    #[test]
    fn minor_12_defaults_to_6_6_2() {
        let resolved = ToolchainVersion::resolve(None, Some(&py(12)));
        assert_eq!(resolved.version, "6.6.2");
        assert_eq!(resolved.source, VersionSource::RuntimeDefault);
    }

    #[test]
    fn table_covers_known_minors() {
        assert_eq!(default_for_minor(13), Some("6.7.2"));
        assert_eq!(default_for_minor(14), Some("6.7.2"));
        assert_eq!(default_for_minor(15), Some("6.8.1"));
        assert_eq!(default_for_minor(11), None);
    }

    #[test]
    fn unrecognized_minor_uses_baseline() {
        let resolved = ToolchainVersion::resolve(None, Some(&py(9)));
        assert_eq!(resolved.version, BASELINE_TOOLCHAIN_VERSION);
        assert_eq!(resolved.source, VersionSource::Baseline);
    }

    #[test]
    fn unknown_runtime_uses_baseline() {
        let resolved = ToolchainVersion::resolve(None, None);
        assert_eq!(resolved.version, "6.5.3");
    }

    #[test]
    fn garbage_installed_version_is_ignored() {
        let resolved = ToolchainVersion::resolve(Some("N/A"), Some(&py(13)));
        assert_eq!(resolved.version, "6.7.2");
        assert_eq!(resolved.source, VersionSource::RuntimeDefault);
    }

    #[test]
    fn source_display() {
        assert_eq!(VersionSource::Installed.to_string(), "installed package");
        assert_eq!(VersionSource::Baseline.to_string(), "baseline");
    }
}
