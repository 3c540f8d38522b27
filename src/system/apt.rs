//! Debian-family implementation of [`SystemProvisioner`].

use std::path::{Path, PathBuf};

use crate::environment::DistroIdentity;
use crate::error::Result;
use crate::shell::{
    is_elevated, privileged_with, run_announced, CommandResult, CommandRunner, Invocation,
};
use crate::ui::UserInterface;

use super::SystemProvisioner;

/// Native package manager used for batch installs.
pub const PACKAGE_MANAGER: &str = "apt-get";

/// Reads the OS release file and installs through `apt-get`.
pub struct AptSystem<'a> {
    runner: &'a dyn CommandRunner,
    os_release: PathBuf,
    elevated: bool,
}

impl<'a> AptSystem<'a> {
    /// Create a provisioner for the current process.
    pub fn new(runner: &'a dyn CommandRunner, os_release: &Path) -> Self {
        Self::with_elevation(runner, os_release, is_elevated())
    }

    /// Create a provisioner with a fixed elevation state.
    pub fn with_elevation(
        runner: &'a dyn CommandRunner,
        os_release: &Path,
        elevated: bool,
    ) -> Self {
        Self {
            runner,
            os_release: os_release.to_path_buf(),
            elevated,
        }
    }

    /// The batch install command for `packages`.
    pub fn install_invocation(&self, packages: &[String]) -> Invocation {
        let inv = Invocation::new(PACKAGE_MANAGER)
            .args(["install", "-y"])
            .args(packages.iter().cloned())
            .env("DEBIAN_FRONTEND", "noninteractive");
        privileged_with(inv, self.elevated)
    }
}

impl SystemProvisioner for AptSystem<'_> {
    fn distro_identity(&self) -> DistroIdentity {
        match std::fs::read_to_string(&self.os_release) {
            Ok(content) => DistroIdentity::from_os_release(&content),
            Err(e) => {
                tracing::debug!("cannot read {}: {}", self.os_release.display(), e);
                DistroIdentity::default()
            }
        }
    }

    fn install_native(
        &self,
        packages: &[String],
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        run_announced(self.runner, ui, &self.install_invocation(packages))
    }
}
