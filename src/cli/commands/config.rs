//! Config command implementation.
//!
//! The `bindup config` command shows the effective configuration after all
//! layers are merged.

use std::path::{Path, PathBuf};

use crate::cli::args::ConfigArgs;
use crate::config::ConfigPaths;
use crate::error::{BindupError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};
use super::{load_or_report, EXIT_CONFIG};

/// The config command implementation.
pub struct ConfigCommand {
    source_dir: PathBuf,
    config_path: Option<PathBuf>,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(source_dir: &Path, config_path: Option<&Path>, args: ConfigArgs) -> Self {
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
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let Some(config) = load_or_report(&self.source_dir, self.config_path.as_deref(), ui)?
        else {
            return Ok(CommandResult::failure(EXIT_CONFIG));
        };

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&config).map_err(|e| BindupError::Other(e.into()))?;
            ui.emit(&json);
            return Ok(CommandResult::success());
        }

        let paths = ConfigPaths::discover(&self.source_dir, self.config_path.as_deref());
        let layers = paths.all();
        if layers.is_empty() {
            ui.message("# built-in defaults");
        }
        for path in layers {
            ui.message(&format!("# {}", path.display()));
        }
        let yaml = serde_yaml::to_string(&config).map_err(|e| BindupError::Other(e.into()))?;
        ui.message(&yaml);

        Ok(CommandResult::success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::MockUI;
    use std::fs;
    use tempfile::TempDir;

    fn setup_source(config: &str) -> TempDir {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join(".bindup.yml"), config).unwrap();
        temp
    }

    #[test]
    fn config_command_creation() {
        let temp = TempDir::new().unwrap();
        let cmd = ConfigCommand::new(temp.path(), None, ConfigArgs::default());
        assert_eq!(cmd.source_dir(), temp.path());
    }

    #[test]
    fn shows_project_config_path_and_yaml() {
        let temp = setup_source("build:\n  tool: ninja-cmake\n");
        let cmd = ConfigCommand::new(temp.path(), None, ConfigArgs::default());
        let mut ui = MockUI::new();

        let result = cmd.execute(&mut ui).unwrap();

        assert!(result.success);
        assert!(ui.has_message(".bindup.yml"));
        assert!(ui.has_message("tool: ninja-cmake"));
    }

    #[test]
    fn json_reflects_explicit_layer() {
        let temp = setup_source("policy:\n  on_failure: abort\n");
        let extra = temp.path().join("ci.yml");
        fs::write(&extra, "policy:\n  strict_exit: true\n").unwrap();
        let cmd = ConfigCommand::new(temp.path(), Some(&extra), ConfigArgs { json: true });
        let mut ui = MockUI::new();

        cmd.execute(&mut ui).unwrap();

        let value: serde_json::Value = serde_json::from_str(&ui.emitted()[0]).unwrap();
        assert_eq!(value["policy"]["on_failure"], "abort");
        assert_eq!(value["policy"]["strict_exit"], true);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let temp = setup_source("build:\n  jobs: 0\n");
        let cmd = ConfigCommand::new(temp.path(), None, ConfigArgs::default());
        let mut ui = MockUI::new();

        let err = cmd.execute(&mut ui).unwrap_err();
        assert!(matches!(err, BindupError::ConfigValidationError { .. }));
    }
}
