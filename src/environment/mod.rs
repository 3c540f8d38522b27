//! Host discovery and toolchain version resolution.
//!
//! [`EnvironmentProber`] reads the host once and produces an
//! [`EnvironmentSnapshot`], which every later stage reads and none mutates.
//! The toolchain version follows this chain:
//!
//! 1. Installed toolchain package version (normalized to three components)
//! 2. Default for the interpreter's minor version
//! 3. Baseline version

pub mod distro;
pub mod probe;
pub mod process_env;
pub mod resolver;
pub mod snapshot;
pub mod version;

pub use distro::DistroIdentity;
pub use probe::EnvironmentProber;
pub use process_env::ProcessEnv;
pub use resolver::{ToolchainVersion, VersionSource, BASELINE_TOOLCHAIN_VERSION};
pub use snapshot::{EnvironmentSnapshot, HostFacts};
pub use version::{normalize_version, version_at_least, RuntimeVersion, UNKNOWN};
