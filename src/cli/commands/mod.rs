//! CLI command implementations.
//!
//! Each command implements the [`Command`] trait, which provides a uniform
//! interface for executing commands and reporting results.
//!
//! # Architecture
//!
//! Commands are dispatched via [`CommandDispatcher`], which routes CLI
//! subcommands to their implementations. This allows:
//! - Single binary with subcommands (`bindup run`, `bindup info`)
//! - Shared config loading
//! - Consistent global flag handling

pub mod completions;
pub mod config;
pub mod dispatcher;
pub mod info;
pub mod run;

pub use dispatcher::{Command, CommandDispatcher, CommandResult};

use std::path::Path;

use crate::config::{load_config, BindupConfig};
use crate::error::{BindupError, Result};
use crate::ui::UserInterface;

/// Exit code when the configuration cannot be loaded.
pub const EXIT_CONFIG: i32 = 2;

/// Load the effective config, reporting a missing explicit file to the user.
///
/// Returns `Ok(None)` after reporting, so the caller can exit with
/// [`EXIT_CONFIG`].
pub(crate) fn load_or_report(
    source_dir: &Path,
    explicit: Option<&Path>,
    ui: &mut dyn UserInterface,
) -> Result<Option<BindupConfig>> {
    match load_config(source_dir, explicit) {
        Ok(config) => Ok(Some(config)),
        Err(e @ BindupError::ConfigNotFound { .. }) => {
            ui.error(&e.to_string());
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
