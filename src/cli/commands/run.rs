//! Run command implementation.
//!
//! The `bindup run` command executes the provisioning pipeline.

use std::path::{Path, PathBuf};

use crate::cli::args::RunArgs;
use crate::config::{BindupConfig, FailurePolicy};
use crate::environment::ProcessEnv;
use crate::error::{BindupError, Result};
use crate::pipeline::Pipeline;
use crate::shell::{CommandRunner, SystemRunner};
use crate::system::{AptSystem, SystemProvisioner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::{load_or_report, EXIT_CONFIG};

/// The run command implementation.
pub struct RunCommand {
    source_dir: PathBuf,
    config_path: Option<PathBuf>,
    args: RunArgs,
}

impl RunCommand {
    /// Create a new run command.
    pub fn new(source_dir: &Path, config_path: Option<&Path>, args: RunArgs) -> Self {
        Self {
            source_dir: source_dir.to_path_buf(),
            config_path: config_path.map(Path::to_path_buf),
            args,
        }
    }

    /// Get the source directory.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    /// Get the command arguments.
    pub fn args(&self) -> &RunArgs {
        &self.args
    }

    /// Apply command-line overrides on top of the loaded config.
    pub fn apply_overrides(&self, config: &mut BindupConfig) {
        if self.args.strict {
            config.policy.strict_exit = true;
        }
        if self.args.abort_on_failure {
            config.policy.on_failure = FailurePolicy::Abort;
        }
        if let Some(jobs) = self.args.jobs {
            config.build.jobs = Some(jobs as usize);
        }
    }

    /// Run the pipeline against the given runner and system.
    pub fn run_with(
        &self,
        config: &BindupConfig,
        runner: &dyn CommandRunner,
        system: &dyn SystemProvisioner,
        env: &ProcessEnv,
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        let pipeline = Pipeline::new(config, runner, system, env, &self.source_dir);
        let report = match pipeline.run(ui) {
            Ok(report) => report,
            Err(e @ BindupError::ModuleUnresolvable { .. }) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(1));
            }
            Err(e) => return Err(e),
        };

        if self.args.json {
            let json = report.to_json().map_err(|e| BindupError::Other(e.into()))?;
            ui.emit(&json);
        } else {
            report.print_summary(ui);
        }

        match report.exit_code(config.policy.strict_exit) {
            0 => Ok(CommandResult::success()),
            code => Ok(CommandResult::failure(i32::from(code))),
        }
    }
}

impl Command for RunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(mut config) = load_or_report(&self.source_dir, self.config_path.as_deref(), ui)?
        else {
            return Ok(CommandResult::failure(EXIT_CONFIG));
        };
        self.apply_overrides(&mut config);
        tracing::debug!("running pipeline in {}", self.source_dir.display());

        let env = ProcessEnv::capture();
        let runner = SystemRunner;
        let system = AptSystem::new(&runner, &config.os_release);
        self.run_with(&config, &runner, &system, &env, ui)
    }
}
