//! Static distribution profiles.

use std::path::PathBuf;

use crate::environment::DistroIdentity;

/// Native packages and config-tool suffix for one tested distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistroProfile {
    /// Distribution id (`debian`, `ubuntu`).
    pub id: &'static str,
    /// Distribution version id.
    pub version: &'static str,
    /// Suffix of the versioned config tool (`llvm-config-<suffix>`).
    pub config_suffix: &'static str,
    /// Native packages installed in one batch.
    pub packages: &'static [&'static str],
}

impl DistroProfile {
    /// Owned package list, ready for the package manager.
    pub fn native_packages(&self) -> Vec<String> {
        self.packages.iter().map(|p| p.to_string()).collect()
    }

    /// Versioned config-tool path for this profile.
    pub fn config_tool(&self, target_prefix: &str) -> PathBuf {
        PathBuf::from(format!("{}{}", target_prefix, self.config_suffix))
    }
}

/// Every tested distribution.
pub const PROFILES: &[DistroProfile] = &[
    DistroProfile {
        id: "debian",
        version: "10",
        config_suffix: "11",
        packages: &[
            "llvm-11",
            "llvm-11-dev",
            "libclang-11-dev",
            "clang-11",
            "patchelf",
            "ninja-build",
        ],
    },
    DistroProfile {
        id: "debian",
        version: "11",
        config_suffix: "13",
        packages: &[
            "llvm-13",
            "llvm-13-dev",
            "libclang-13-dev",
            "clang-13",
            "patchelf",
            "ninja-build",
        ],
    },
    DistroProfile {
        id: "debian",
        version: "12",
        config_suffix: "14",
        packages: &[
            "llvm-14",
            "llvm-14-dev",
            "libclang-14-dev",
            "clang-14",
            "libgl-dev",
            "patchelf",
            "ninja-build",
        ],
    },
    DistroProfile {
        id: "ubuntu",
        version: "20.04",
        config_suffix: "12",
        packages: &[
            "llvm-12",
            "llvm-12-dev",
            "libclang-12-dev",
            "clang-12",
            "patchelf",
            "ninja-build",
        ],
    },
    DistroProfile {
        id: "ubuntu",
        version: "24.04",
        config_suffix: "18",
        packages: &[
            "llvm-18",
            "llvm-18-dev",
            "libclang-18-dev",
            "clang-18",
            "patchelf",
            "ninja-build",
        ],
    },
];

/// Result of looking a distribution up in [`PROFILES`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileLookup {
    /// A tested id and version.
    Recognised(&'static DistroProfile),
    /// A known id at a version that has no profile.
    UntestedVersion(String),
    /// An id that has no profile at all.
    UntestedSystem,
}

impl ProfileLookup {
    /// The profile, if recognised.
    pub fn profile(&self) -> Option<&'static DistroProfile> {
        match self {
            ProfileLookup::Recognised(p) => Some(p),
            _ => None,
        }
    }

    /// Warning shown for unrecognised distributions.
    pub fn warning(&self) -> Option<String> {
        match self {
            ProfileLookup::Recognised(_) => None,
            ProfileLookup::UntestedVersion(id) => {
                Some(format!("untested {} version!", capitalize(id)))
            }
            ProfileLookup::UntestedSystem => {
                Some("untested operating system!".to_string())
            }
        }
    }
}

/// Find the profile for a distribution identity.
pub fn lookup(identity: &DistroIdentity) -> ProfileLookup {
    let Some(id) = identity.id.as_deref() else {
        return ProfileLookup::UntestedSystem;
    };
    if !PROFILES.iter().any(|p| p.id == id) {
        return ProfileLookup::UntestedSystem;
    }

    PROFILES
        .iter()
        .find(|p| p.id == id && Some(p.version) == identity.version.as_deref())
        .map(ProfileLookup::Recognised)
        .unwrap_or_else(|| ProfileLookup::UntestedVersion(id.to_string()))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
