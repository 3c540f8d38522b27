//! Visual theme and styling.

use console::Style;

/// bindup's visual theme.
#[derive(Debug, Clone)]
pub struct BindupTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (orange).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for stage banners (cyan bold).
    pub header: Style,
    /// Style for commands shown in output (dim italic).
    pub command: Style,
    /// Style for key labels in key-value displays (bold).
    pub key: Style,
}

impl Default for BindupTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl BindupTheme {
    /// Create the default colored theme.
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().color256(208),
            error: Style::new().red().bold(),
            dim: Style::new().dim(),
            header: Style::new().bold().cyan(),
            command: Style::new().dim().italic(),
            key: Style::new().bold(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            dim: Style::new(),
            header: Style::new(),
            command: Style::new(),
            key: Style::new(),
        }
    }

    /// Format a success message (icon + text in green).
    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    /// Format a warning message (icon + text in orange).
    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    /// Format an error message (icon + text in red bold).
    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    /// Format a stage banner.
    pub fn format_header(&self, title: &str) -> String {
        format!("{}", self.header.apply_to(format!("** {}", title)))
    }

    /// Format an announced command.
    pub fn format_command(&self, command: &str) -> String {
        format!("- Running: '{}'", self.command.apply_to(command))
    }

    /// Format a `key: value` line with the key padded to `width`.
    pub fn format_key_value(&self, key: &str, value: &str, width: usize) -> String {
        format!(
            "{} : {}",
            self.key.apply_to(format!("{:<width$}", key, width = width)),
            value
        )
    }
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    // Check NO_COLOR env var (https://no-color.org/)
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_formats_success() {
        let msg = BindupTheme::plain().format_success("Complete");
        assert_eq!(msg, "✓ Complete");
    }

    #[test]
    fn theme_formats_warning() {
        let msg = BindupTheme::plain().format_warning("untested Debian version!");
        assert!(msg.starts_with("⚠"));
        assert!(msg.contains("Debian"));
    }

    #[test]
    fn theme_formats_error() {
        let msg = BindupTheme::plain().format_error("Failed");
        assert_eq!(msg, "✗ Failed");
    }

    #[test]
    fn theme_formats_header_as_banner() {
        let msg = BindupTheme::plain().format_header("Build module");
        assert_eq!(msg, "** Build module");
    }

    #[test]
    fn theme_formats_command() {
        let msg = BindupTheme::plain().format_command("cmake --install build");
        assert_eq!(msg, "- Running: 'cmake --install build'");
    }

    #[test]
    fn theme_pads_keys() {
        let msg = BindupTheme::plain().format_key_value("Distribution", "ubuntu", 20);
        assert_eq!(msg, "Distribution         : ubuntu");
    }

    #[test]
    fn default_impl_matches_new() {
        let default = BindupTheme::default();
        let new = BindupTheme::new();
        assert_eq!(default.format_success("test"), new.format_success("test"));
    }
}
