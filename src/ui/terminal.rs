//! Console output for interactive terminals and CI logs alike.

use super::theme::{should_use_colors, BindupTheme};
use super::{OutputMode, UserInterface};

/// Width of the key column in `key_value` output.
const KEY_WIDTH: usize = 20;

/// UI implementation that writes to stdout/stderr.
///
/// bindup never prompts, so a single implementation serves both
/// terminals and headless runs; only styling differs.
pub struct TerminalUI {
    mode: OutputMode,
    theme: BindupTheme,
}

impl TerminalUI {
    /// Create a new terminal UI, choosing colors from the environment.
    pub fn new(mode: OutputMode) -> Self {
        let theme = if should_use_colors() {
            BindupTheme::new()
        } else {
            BindupTheme::plain()
        };
        Self { mode, theme }
    }

    /// Create with an explicit theme.
    pub fn with_theme(mode: OutputMode, theme: BindupTheme) -> Self {
        Self { mode, theme }
    }
}

impl UserInterface for TerminalUI {
    fn output_mode(&self) -> OutputMode {
        self.mode
    }

    fn message(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", msg);
        }
    }

    fn success(&mut self, msg: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_success(msg));
        }
    }

    fn warning(&mut self, msg: &str) {
        if self.mode.shows_status() {
            eprintln!("{}", self.theme.format_warning(msg));
        }
    }

    fn error(&mut self, msg: &str) {
        eprintln!("{}", self.theme.format_error(msg));
    }

    fn show_header(&mut self, title: &str) {
        if self.mode.shows_progress() {
            println!("{}", self.theme.format_header(title));
        }
    }

    fn show_command(&mut self, command: &str) {
        if self.mode.shows_progress() {
            println!("{}", self.theme.format_command(command));
        }
    }

    fn command_output(&mut self, output: &str) {
        if output.trim().is_empty() || !self.mode.shows_status() {
            return;
        }
        for line in output.lines() {
            eprintln!("  {}", self.theme.dim.apply_to(line));
        }
    }

    fn key_value(&mut self, key: &str, value: &str) {
        if self.mode.shows_status() {
            println!("{}", self.theme.format_key_value(key, value, KEY_WIDTH));
        }
    }

    fn emit(&mut self, data: &str) {
        println!("{}", data);
    }
}
