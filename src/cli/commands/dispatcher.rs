//! Command dispatching.
//!
//! This module provides the core command infrastructure:
//! - [`Command`] trait for implementing commands
//! - [`CommandResult`] for uniform result reporting
//! - [`CommandDispatcher`] for routing CLI subcommands

use std::path::{Path, PathBuf};

use crate::cli::args::{Cli, Commands, RunArgs};
use crate::error::Result;
use crate::ui::UserInterface;

/// Trait for command implementations.
///
/// Each CLI subcommand implements this trait to provide its execution logic.
pub trait Command {
    /// Execute the command.
    ///
    /// # Arguments
    ///
    /// * `ui` - User interface for displaying output
    ///
    /// # Returns
    ///
    /// A [`CommandResult`] indicating success/failure and exit code.
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult>;
}

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Dispatches CLI commands to their implementations.
pub struct CommandDispatcher {
    source_dir: PathBuf,
    config_path: Option<PathBuf>,
}

impl CommandDispatcher {
    /// Create a new dispatcher for the given source directory.
    pub fn new(source_dir: PathBuf, config_path: Option<PathBuf>) -> Self {
        Self {
            source_dir,
            config_path,
        }
    }

    /// Get the source directory.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Dispatch and execute a command.
    ///
    /// With no subcommand, `run` executes with default arguments.
    pub fn dispatch(&self, cli: &Cli, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config_path = self.config_path.as_deref();
        match &cli.command {
            Some(Commands::Run(args)) => {
                let cmd = super::run::RunCommand::new(&self.source_dir, config_path, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Info(args)) => {
                let cmd =
                    super::info::InfoCommand::new(&self.source_dir, config_path, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Config(args)) => {
                let cmd =
                    super::config::ConfigCommand::new(&self.source_dir, config_path, args.clone());
                cmd.execute(ui)
            }
            Some(Commands::Completions(args)) => {
                let cmd = super::completions::CompletionsCommand::new(args.clone());
                cmd.execute(ui)
            }
            None => {
                let cmd =
                    super::run::RunCommand::new(&self.source_dir, config_path, RunArgs::default());
                cmd.execute(ui)
            }
        }
    }
}
