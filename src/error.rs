//! Error types for bindup operations.
//!
//! This module defines [`BindupError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Absence (a package or path that isn't there) is never an error; it is
//!   modelled as `Option::None` by the probing code
//! - A tool that runs and exits non-zero is not an error either; callers get
//!   a [`CommandResult`](crate::shell::CommandResult) with `success == false`
//! - Use `BindupError` for conditions that must stop the current operation
//! - Use `anyhow::Error` (via `BindupError::Other`) for unexpected errors

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for bindup operations.
#[derive(Debug, Error)]
pub enum BindupError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// An external program could not be started at all.
    #[error("Could not start '{command}': {message}")]
    CommandSpawn { command: String, message: String },

    /// A module that was expected to be installed cannot be resolved.
    #[error("{module} was not found. Please install it and run bindup again")]
    ModuleUnresolvable { module: String },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for bindup operations.
pub type Result<T> = std::result::Result<T, BindupError>;
