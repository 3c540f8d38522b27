//! bindup - Host provisioning and build driver for Qt widget bindings.
//!
//! bindup probes the host, installs the interpreter packages and toolchain
//! bundle the bindings need, prepares distro-specific native packages,
//! builds and installs the binding module, and smoke-imports the result.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, merging, and validation
//! - [`environment`] - Host probing and the environment snapshot
//! - [`error`] - Error types and result aliases
//! - [`packages`] - Language-package reconciliation and toolchain acquisition
//! - [`system`] - Native package manager abstraction
//! - [`provision`] - Distro profiles, crypto shim, and config-tool symlink
//! - [`build`] - Configure / compile / install orchestration
//! - [`finalize`] - Library relocation and smoke import
//! - [`pipeline`] - Stage sequencing and the run report
//! - [`shell`] - External command execution
//! - [`ui`] - Terminal output
//!
//! # Example
//!
//! ```
//! use bindup::environment::{RuntimeVersion, ToolchainVersion};
//!
//! let runtime = RuntimeVersion::new(3, 12, 1);
//! let resolved = ToolchainVersion::resolve(None, Some(&runtime));
//! assert_eq!(resolved.version, "6.6.2");
//! ```
//!
//! For driving the full pipeline against mocks, see the integration tests.

pub mod build;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod finalize;
pub mod packages;
pub mod pipeline;
pub mod provision;
pub mod shell;
pub mod system;
pub mod ui;

pub use error::{BindupError, Result};
