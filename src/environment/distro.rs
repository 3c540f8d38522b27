//! Operating system distribution identity.

use serde::Serialize;
use std::fmt;

use super::version::UNKNOWN;

/// Distribution id and version, as reported by the OS release file.
///
/// Either part may be absent; absence is shown as `unknown`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DistroIdentity {
    /// Lower-case distribution id (`debian`, `ubuntu`, ...).
    pub id: Option<String>,
    /// Version id (`12`, `24.04`, ...).
    pub version: Option<String>,
}

impl DistroIdentity {
    /// Create an identity from known id and version.
    pub fn new(id: &str, version: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            version: Some(version.to_string()),
        }
    }

    /// Parse the contents of an `os-release` file.
    ///
    /// Reads `ID` and `VERSION_ID`, stripping optional quotes. Comments and
    /// malformed lines are ignored.
    pub fn from_os_release(content: &str) -> Self {
        let mut identity = Self::default();

        for line in content.lines() {
            let line = line.trim();
            if line.starts_with('#') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let value = value.trim().trim_matches('"').trim_matches('\'');
            if value.is_empty() {
                continue;
            }
            match key.trim() {
                "ID" => identity.id = Some(value.to_lowercase()),
                "VERSION_ID" => identity.version = Some(value.to_string()),
                _ => {}
            }
        }

        identity
    }

    /// The id, or `unknown`.
    pub fn id_or_unknown(&self) -> &str {
        self.id.as_deref().unwrap_or(UNKNOWN)
    }

    /// The version, or `unknown`.
    pub fn version_or_unknown(&self) -> &str {
        self.version.as_deref().unwrap_or(UNKNOWN)
    }
}

impl fmt::Display for DistroIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id_or_unknown(), self.version_or_unknown())
    }
}
