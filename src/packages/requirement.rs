//! Declarative language-package requirements.

use std::fmt;

use crate::config::BindupConfig;

/// Version constraint on a requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionPin {
    /// Any installed version satisfies the requirement.
    Any,
    /// Exactly this version is installed when missing.
    Exact(String),
}

/// A language package that must be present before the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRequirement {
    /// Distribution name as the package manager knows it.
    pub name: String,
    /// Version constraint.
    pub version: VersionPin,
    /// Extra arguments appended to the install command.
    pub extra_args: Vec<String>,
}

impl PackageRequirement {
    /// A requirement satisfied by any version.
    pub fn any(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: VersionPin::Any,
            extra_args: Vec::new(),
        }
    }

    /// A requirement pinned to an exact version.
    pub fn exact(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: VersionPin::Exact(version.to_string()),
            extra_args: Vec::new(),
        }
    }

    /// Add extra install arguments.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The install specifier (`name` or `name==version`).
    pub fn specifier(&self) -> String {
        match &self.version {
            VersionPin::Any => self.name.clone(),
            VersionPin::Exact(v) => format!("{}=={}", self.name, v),
        }
    }
}

impl fmt::Display for PackageRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.specifier())
    }
}

/// Name of the package that ships the toolchain acquisition tool.
pub const ACQUISITION_PACKAGE: &str = "aqtinstall";

/// The flat required set, in install order.
///
/// The acquisition tool comes first; the toolchain bindings and both
/// generator packages are pinned to the resolved toolchain version.
pub fn required_packages(
    toolchain_version: &str,
    config: &BindupConfig,
) -> Vec<PackageRequirement> {
    vec![
        PackageRequirement::any(ACQUISITION_PACKAGE),
        PackageRequirement::exact(&config.runtime.toolchain_package, toolchain_version),
        PackageRequirement::exact("shiboken6", toolchain_version),
        PackageRequirement::exact("shiboken6-generator", toolchain_version),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn specifier_reflects_pin() {
        assert_eq!(PackageRequirement::any("aqtinstall").specifier(), "aqtinstall");
        assert_eq!(
            PackageRequirement::exact("PySide6", "6.6.2").specifier(),
            "PySide6==6.6.2"
        );
    }

    #[test]
    fn required_set_is_ordered_and_pinned() {
        let set = required_packages("6.7.2", &BindupConfig::default());
        let specs: Vec<String> = set.iter().map(PackageRequirement::specifier).collect();
        assert_eq!(
            specs,
            [
                "aqtinstall",
                "PySide6==6.7.2",
                "shiboken6==6.7.2",
                "shiboken6-generator==6.7.2"
            ]
        );
    }

    #[test]
    fn required_set_follows_configured_package() {
        let mut config = BindupConfig::default();
        config.runtime.toolchain_package = "PySide6-Essentials".to_string();
        let set = required_packages("6.8.1", &config);
        assert_eq!(set[1].name, "PySide6-Essentials");
    }

    #[test]
    fn with_args_appends() {
        let req = PackageRequirement::any("x").with_args(["--no-deps"]);
        assert_eq!(req.extra_args, vec!["--no-deps"]);
    }
}
