//! Language-package reconciliation and toolchain acquisition.
//!
//! The required set is a flat, ordered list of [`PackageRequirement`]s.
//! [`Reconciler::ensure`] installs whatever is missing, retrying once against
//! the mirror, and reports the result as an [`EnsureOutcome`] instead of an
//! error.

pub mod pip;
pub mod reconciler;
pub mod requirement;
pub mod toolchain;

pub use pip::{parse_show_version, InstallSource, PipFrontend, ISOLATION_FLAG};
pub use reconciler::{EnsureOutcome, Reconciler};
pub use requirement::{required_packages, PackageRequirement, VersionPin, ACQUISITION_PACKAGE};
pub use toolchain::{acquisition_invocation, ensure_toolchain, FetchOutcome, ACQUISITION_TOOL};
