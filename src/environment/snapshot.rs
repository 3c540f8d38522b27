//! The environment snapshot every pipeline stage reads.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::BindupConfig;
use crate::ui::UserInterface;

use super::distro::DistroIdentity;
use super::resolver::ToolchainVersion;
use super::version::{RuntimeVersion, UNKNOWN};

/// Raw facts gathered from the host before any derivation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFacts {
    /// Interpreter version, if the interpreter answered.
    pub runtime_version: Option<RuntimeVersion>,
    /// Installed version of the toolchain package, if any.
    pub installed_toolchain: Option<String>,
    /// Distribution identity.
    pub distro: DistroIdentity,
    /// Home directory of the invoking user.
    pub home: Option<PathBuf>,
}

/// Consistent view of the host, derived once at startup.
///
/// Nothing mutates a snapshot after [`EnvironmentSnapshot::assemble`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnvironmentSnapshot {
    /// Interpreter version (`None` when it could not be probed).
    pub runtime_version: Option<RuntimeVersion>,
    /// Resolved toolchain bundle version.
    pub toolchain: ToolchainVersion,
    /// Distribution identity.
    pub distro: DistroIdentity,
    /// Source tree containing the build description.
    pub source_dir: PathBuf,
    /// Build directory, recreated on every run.
    pub build_dir: PathBuf,
    /// Directory holding fetched toolchain bundles.
    pub toolchain_dir: PathBuf,
    /// Root of the versioned bundle; handed to the build as discovery hint.
    pub toolchain_root: PathBuf,
    /// Shared libraries of the versioned bundle.
    pub toolchain_lib_dir: PathBuf,
    /// Whether the home directory was known. When it was not, the
    /// user-scoped paths below are rooted at `/` and must not be written to.
    pub home_known: bool,
    /// User-scoped package directory of the interpreter.
    pub site_packages_dir: PathBuf,
    /// Installed runtime toolchain package.
    pub runtime_package_dir: PathBuf,
    /// Destination package of the binding module.
    pub binding_package_dir: PathBuf,
}

impl EnvironmentSnapshot {
    /// Derive a snapshot from host facts and configuration.
    pub fn assemble(facts: HostFacts, source_dir: &Path, config: &BindupConfig) -> Self {
        let toolchain = ToolchainVersion::resolve(
            facts.installed_toolchain.as_deref(),
            facts.runtime_version.as_ref(),
        );

        let toolchain_dir = source_dir.join(&config.toolchain.dir_name);
        let toolchain_root = toolchain_dir
            .join(&toolchain.version)
            .join(&config.toolchain.arch);
        let toolchain_lib_dir = toolchain_root.join("lib");

        let build_dir = config
            .build_dir
            .clone()
            .unwrap_or_else(|| source_dir.join("build"));

        let interpreter_dir = match &facts.runtime_version {
            Some(v) => format!("python{}", v.short()),
            None => "python3".to_string(),
        };
        let home_known = facts.home.is_some();
        let home = facts.home.unwrap_or_else(|| PathBuf::from("/"));
        let site_packages_dir = home
            .join(".local")
            .join("lib")
            .join(interpreter_dir)
            .join("site-packages");

        Self {
            runtime_version: facts.runtime_version,
            toolchain,
            distro: facts.distro,
            source_dir: source_dir.to_path_buf(),
            build_dir,
            toolchain_dir,
            toolchain_root,
            toolchain_lib_dir,
            runtime_package_dir: site_packages_dir.join(&config.runtime.toolchain_package),
            binding_package_dir: site_packages_dir.join(&config.runtime.binding_package),
            home_known,
            site_packages_dir,
        }
    }

    /// Interpreter version for display.
    pub fn runtime_version_display(&self) -> String {
        self.runtime_version
            .map(|v| v.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }

    /// Library directory of the installed runtime toolchain package.
    pub fn runtime_lib_dir(&self) -> PathBuf {
        self.runtime_package_dir.join("Qt").join("lib")
    }

    /// Print the snapshot as aligned key/value lines.
    pub fn print_info(&self, ui: &mut dyn UserInterface) {
        ui.key_value("Runtime version", &self.runtime_version_display());
        ui.key_value(
            "Toolchain version",
            &format!("{} ({})", self.toolchain.version, self.toolchain.source),
        );
        ui.key_value("Toolchain path", &self.toolchain_dir.display().to_string());
        ui.key_value("Distribution", self.distro.id_or_unknown());
        ui.key_value("Distribution version", self.distro.version_or_unknown());
        ui.key_value(
            "Runtime package dir",
            &self.runtime_package_dir.display().to_string(),
        );
        ui.key_value("Source directory", &self.source_dir.display().to_string());
        ui.key_value("Build directory", &self.build_dir.display().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::VersionSource;
    use crate::ui::MockUI;

    fn facts(minor: Option<u32>) -> HostFacts {
        HostFacts {
            runtime_version: minor.map(|m| RuntimeVersion::new(3, m, 1)),
            installed_toolchain: None,
            distro: DistroIdentity::new("ubuntu", "24.04"),
            home: Some(PathBuf::from("/home/dev")),
        }
    }

    #[test]
    fn derives_toolchain_paths_from_version() {
        let snap = EnvironmentSnapshot::assemble(
            facts(Some(12)),
            Path::new("/src/widgets"),
            &BindupConfig::default(),
        );
        assert_eq!(snap.toolchain.version, "6.6.2");
        assert_eq!(snap.toolchain_dir, PathBuf::from("/src/widgets/Qt"));
        assert_eq!(
            snap.toolchain_root,
            PathBuf::from("/src/widgets/Qt/6.6.2/gcc_64")
        );
        assert_eq!(
            snap.toolchain_lib_dir,
            PathBuf::from("/src/widgets/Qt/6.6.2/gcc_64/lib")
        );
        assert_eq!(snap.build_dir, PathBuf::from("/src/widgets/build"));
    }

    #[test]
    fn derives_site_packages_from_runtime_version() {
        let snap = EnvironmentSnapshot::assemble(
            facts(Some(12)),
            Path::new("/src"),
            &BindupConfig::default(),
        );
        assert_eq!(
            snap.site_packages_dir,
            PathBuf::from("/home/dev/.local/lib/python3.12/site-packages")
        );
        assert_eq!(
            snap.binding_package_dir,
            PathBuf::from("/home/dev/.local/lib/python3.12/site-packages/PyTasteQtWidgets")
        );
        assert_eq!(
            snap.runtime_lib_dir(),
            PathBuf::from("/home/dev/.local/lib/python3.12/site-packages/PySide6/Qt/lib")
        );
    }

    #[test]
    fn unknown_runtime_degrades_gracefully() {
        let snap =
            EnvironmentSnapshot::assemble(facts(None), Path::new("/src"), &BindupConfig::default());
        assert_eq!(snap.runtime_version_display(), "unknown");
        assert_eq!(snap.toolchain.source, VersionSource::Baseline);
        assert!(snap.site_packages_dir.ends_with("python3/site-packages"));
    }

    #[test]
    fn installed_toolchain_overrides_default() {
        let mut host = facts(Some(12));
        host.installed_toolchain = Some("6.8.0.2".to_string());
        let snap =
            EnvironmentSnapshot::assemble(host, Path::new("/src"), &BindupConfig::default());
        assert_eq!(snap.toolchain.version, "6.8.0");
        assert!(snap.toolchain_root.ends_with("Qt/6.8.0/gcc_64"));
    }

    #[test]
    fn configured_build_dir_is_used() {
        let config = BindupConfig {
            build_dir: Some(PathBuf::from("/tmp/out")),
            ..Default::default()
        };
        let snap = EnvironmentSnapshot::assemble(facts(Some(13)), Path::new("/src"), &config);
        assert_eq!(snap.build_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn print_info_lists_key_facts() {
        let snap = EnvironmentSnapshot::assemble(
            facts(Some(12)),
            Path::new("/src"),
            &BindupConfig::default(),
        );
        let mut ui = MockUI::new();
        snap.print_info(&mut ui);
        assert_eq!(ui.value_of("Runtime version"), Some("3.12.1"));
        assert_eq!(ui.value_of("Distribution"), Some("ubuntu"));
        assert_eq!(ui.value_of("Distribution version"), Some("24.04"));
        assert_eq!(ui.value_of("Build directory"), Some("/src/build"));
    }
}
