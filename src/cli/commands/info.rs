//! Info command implementation.
//!
//! The `bindup info` command probes the host and prints what the pipeline
//! would work with, without changing anything.

use std::path::{Path, PathBuf};

use crate::cli::args::InfoArgs;
use crate::config::BindupConfig;
use crate::environment::{EnvironmentProber, EnvironmentSnapshot};
use crate::error::{BindupError, Result};
use crate::shell::{CommandRunner, SystemRunner};
use crate::system::{AptSystem, SystemProvisioner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::{load_or_report, EXIT_CONFIG};

/// The info command implementation.
pub struct InfoCommand {
    source_dir: PathBuf,
    config_path: Option<PathBuf>,
    args: InfoArgs,
}

impl InfoCommand {
    /// Create a new info command.
    pub fn new(source_dir: &Path, config_path: Option<&Path>, args: InfoArgs) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Print a snapshot as key/value lines or JSON.
    pub fn show(&self, snapshot: &EnvironmentSnapshot, ui: &mut dyn UserInterface) -> Result<()> {
        if self.args.json {
            let json =
                serde_json::to_string_pretty(snapshot).map_err(|e| BindupError::Other(e.into()))?;
            ui.emit(&json);
        } else {
            ui.show_header("Gain system info");
            snapshot.print_info(ui);
        }
        Ok(())
    }

    fn probe(
        &self,
        config: &BindupConfig,
        runner: &dyn CommandRunner,
        system: &dyn SystemProvisioner,
    ) -> EnvironmentSnapshot {
        EnvironmentProber::new(config, runner, system).probe(&self.source_dir)
    }
}

impl Command for InfoCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = load_or_report(&self.source_dir, self.config_path.as_deref(), ui)?
        else {
            return Ok(CommandResult::failure(EXIT_CONFIG));
        };

        let runner = SystemRunner;
        let system = AptSystem::new(&runner, &config.os_release);
        let snapshot = self.probe(&config, &runner, &system);
        self.show(&snapshot, ui)?;
        Ok(CommandResult::success())
    }
}
