//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// bindup - Provision a host and build the Qt widget bindings.
#[derive(Debug, Parser)]
#[command(name = "bindup")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to an extra config file, merged over .bindup.yml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Binding source directory (overrides current directory)
    #[arg(short, long, global = true)]
    pub source: Option<PathBuf>,

    /// Show verbose output, including successful command output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Whether the selected command writes JSON to stdout.
    pub fn wants_json(&self) -> bool {
        match &self.command {
            Some(Commands::Run(args)) => args.json,
            Some(Commands::Info(args)) => args.json,
            Some(Commands::Config(args)) => args.json,
            _ => false,
        }
    }
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the provisioning pipeline (default if no command specified)
    Run(RunArgs),

    /// Show what bindup detects about this host
    Info(InfoArgs),

    /// Show the effective configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct RunArgs {
    /// Exit with status 3 when any stage failed
    #[arg(long)]
    pub strict: bool,

    /// Skip the remaining stages after the first failure
    #[arg(long)]
    pub abort_on_failure: bool,

    /// Parallel compile jobs
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    pub jobs: Option<u64>,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct InfoArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON instead of YAML
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
