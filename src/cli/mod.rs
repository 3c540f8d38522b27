//! Command-line interface for bindup.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations

pub mod args;
pub mod commands;

pub use args::{Cli, Commands, CompletionsArgs, ConfigArgs, InfoArgs, RunArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
