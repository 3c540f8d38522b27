//! Configuration schema definitions for bindup.
//!
//! This module contains the struct definitions that map to the YAML
//! configuration file format. Every field has a default, so an empty file
//! (or no file at all) describes the stock pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for `.bindup.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindupConfig {
    /// Build directory (defaults to `<source>/build`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_dir: Option<PathBuf>,

    /// OS release file used to identify the distribution
    pub os_release: PathBuf,

    /// Dynamic-library search path variable extended for build stages
    pub library_path_var: String,

    /// Interpreter and language-package settings
    pub runtime: RuntimeSettings,

    /// Toolchain bundle settings
    pub toolchain: ToolchainSettings,

    /// Secondary package source
    pub mirror: MirrorSettings,

    /// Native build system settings
    pub build: BuildSettings,

    /// Well-known config-tool symlink
    pub symlink: SymlinkSettings,

    /// Failure handling
    pub policy: PolicySettings,

    /// Statements executed by the post-install smoke import
    pub smoke_imports: Vec<String>,
}

impl Default for BindupConfig {
    fn default() -> Self {
        Self {
            build_dir: None,
            os_release: PathBuf::from("/etc/os-release"),
            library_path_var: "LD_LIBRARY_PATH".to_string(),
            runtime: RuntimeSettings::default(),
            toolchain: ToolchainSettings::default(),
            mirror: MirrorSettings::default(),
            build: BuildSettings::default(),
            symlink: SymlinkSettings::default(),
            policy: PolicySettings::default(),
            smoke_imports: vec![
                "from PySide6.QtWidgets import QApplication".to_string(),
                "from PyTasteQtWidgets import TasteQtWidgets".to_string(),
            ],
        }
    }
}

/// Interpreter and language-package settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeSettings {
    /// Interpreter executable
    pub interpreter: String,

    /// Package that ships the runtime toolchain bindings
    pub toolchain_package: String,

    /// Package produced by the build
    pub binding_package: String,
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self {
            interpreter: "python3".to_string(),
            toolchain_package: "PySide6".to_string(),
            binding_package: "PyTasteQtWidgets".to_string(),
        }
    }
}

/// Toolchain bundle settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolchainSettings {
    /// Directory under the source tree holding fetched bundles
    pub dir_name: String,

    /// Architecture directory inside a versioned bundle
    pub arch: String,

    /// Download origin handed to the acquisition tool
    pub base_url: String,

    /// Host platform handed to the acquisition tool
    pub host: String,

    /// Target platform handed to the acquisition tool
    pub target: String,

    /// Toolchain version from which the crypto shim is needed
    pub crypto_shim_min_version: String,

    /// Gzip tarball (relative to the source dir) holding the crypto shim
    pub crypto_shim_archive: PathBuf,
}

impl Default for ToolchainSettings {
    fn default() -> Self {
        Self {
            dir_name: "Qt".to_string(),
            arch: "gcc_64".to_string(),
            base_url: "https://download.qt.io".to_string(),
            host: "linux".to_string(),
            target: "desktop".to_string(),
            crypto_shim_min_version: "6.6.0".to_string(),
            crypto_shim_archive: PathBuf::from("openssl3.tar.gz"),
        }
    }
}

/// How the mirror source is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MirrorStrategy {
    /// Try the primary index, retry once against the mirror
    #[default]
    Fallback,
    /// Install from the mirror only
    Always,
}

/// Secondary package source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MirrorSettings {
    /// Index URL of the mirror
    pub index_url: String,

    /// Host trusted without certificate verification
    pub trusted_host: String,

    /// When to use the mirror
    pub strategy: MirrorStrategy,
}

impl Default for MirrorSettings {
    fn default() -> Self {
        Self {
            index_url: "https://download.qt.io/official_releases/QtForPython/".to_string(),
            trusted_host: "download.qt.io".to_string(),
            strategy: MirrorStrategy::Fallback,
        }
    }
}

/// Native build system settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSettings {
    /// Build system executable
    pub tool: String,

    /// Parallel compile jobs (defaults to one less than the core count)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            tool: "cmake".to_string(),
            jobs: None,
        }
    }
}

/// Well-known config-tool symlink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymlinkSettings {
    /// Unversioned link that discovery tools look for
    pub link: PathBuf,

    /// Versioned target, completed with the distro profile's suffix
    pub target_prefix: String,
}

impl Default for SymlinkSettings {
    fn default() -> Self {
        Self {
            link: PathBuf::from("/usr/bin/llvm-config"),
            target_prefix: "/usr/bin/llvm-config-".to_string(),
        }
    }
}

/// What happens after a stage fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Log the failure and run the remaining stages
    #[default]
    Continue,
    /// Skip every stage after the first failure
    Abort,
}

/// Failure handling.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicySettings {
    /// Behaviour after a failed stage
    pub on_failure: FailurePolicy,

    /// Exit non-zero when any stage failed
    pub strict_exit: bool,
}
