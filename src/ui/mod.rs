//! User-facing terminal output.
//!
//! This module provides:
//! - [`UserInterface`] trait for UI abstraction
//! - [`TerminalUI`] for real terminal output
//! - [`MockUI`] for capturing output in tests
//!
//! # Example
//!
//! ```
//! use bindup::ui::{MockUI, UserInterface};
//!
//! let mut ui = MockUI::new();
//! ui.show_header("Clear build directory");
//! ui.success("Build directory recreated");
//! assert!(ui.has_header("Clear build directory"));
//! ```

pub mod terminal;
pub mod mock;
pub mod output;
pub mod theme;

pub use terminal::TerminalUI;
pub use mock::MockUI;
pub use output::OutputMode;
pub use theme::{should_use_colors, BindupTheme};

/// Trait for user interface interactions.
///
/// Pipeline code only talks to this trait, which allows capturing all
/// output in tests.
pub trait UserInterface {
    /// Get the current output mode.
    fn output_mode(&self) -> OutputMode;

    /// Display a message to the user.
    fn message(&mut self, msg: &str);

    /// Display a success message.
    fn success(&mut self, msg: &str);

    /// Display a warning message.
    fn warning(&mut self, msg: &str);

    /// Display an error message.
    fn error(&mut self, msg: &str);

    /// Show a stage banner.
    fn show_header(&mut self, title: &str);

    /// Announce an external command before it runs.
    fn show_command(&mut self, command: &str);

    /// Show captured output of an external command.
    fn command_output(&mut self, output: &str);

    /// Show an aligned `key: value` line.
    fn key_value(&mut self, key: &str, value: &str);

    /// Write machine-readable output to stdout regardless of mode.
    fn emit(&mut self, data: &str);
}
