//! Presence check and install of language packages.

use crate::config::{MirrorSettings, MirrorStrategy};
use crate::error::{BindupError, Result};
use crate::shell::run_announced;
use crate::ui::UserInterface;

use super::pip::{InstallSource, PipFrontend};
use super::requirement::PackageRequirement;

/// What `ensure` did for a requirement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// The package was already installed (any version); holds that version.
    AlreadyPresent(String),
    /// Installed from the primary index.
    Installed,
    /// Installed from the mirror.
    InstalledFromMirror,
    /// Every install attempt failed.
    Failed,
}

impl EnsureOutcome {
    /// Whether the requirement is satisfied after the call.
    pub fn is_satisfied(&self) -> bool {
        !matches!(self, EnsureOutcome::Failed)
    }
}

/// Reconciles a flat required set against the installed packages.
pub struct Reconciler<'a> {
    pip: PipFrontend<'a>,
    mirror: &'a MirrorSettings,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler over a pip front-end and mirror settings.
    pub fn new(pip: PipFrontend<'a>, mirror: &'a MirrorSettings) -> Self {
        Self { pip, mirror }
    }

    /// Install `requirement` unless it is already present.
    ///
    /// Install failures are reported through the UI and the returned
    /// outcome, never as an error.
    pub fn ensure(
        &self,
        requirement: &PackageRequirement,
        ui: &mut dyn UserInterface,
    ) -> EnsureOutcome {
        if let Some(version) = self.pip.installed_version(&requirement.name) {
            tracing::debug!("{} already installed ({})", requirement.name, version);
            return EnsureOutcome::AlreadyPresent(version);
        }

        if self.mirror.strategy == MirrorStrategy::Fallback {
            if self.attempt(requirement, InstallSource::Primary, ui) {
                return EnsureOutcome::Installed;
            }
            ui.message("Trying to install from the mirror");
        }

        if self.attempt(requirement, InstallSource::Mirror(self.mirror), ui) {
            return EnsureOutcome::InstalledFromMirror;
        }

        ui.warning(&format!("Installation failed: {}", requirement.name));
        EnsureOutcome::Failed
    }

    /// Ensure every requirement in order.
    pub fn ensure_all(
        &self,
        requirements: &[PackageRequirement],
        ui: &mut dyn UserInterface,
    ) -> Vec<(String, EnsureOutcome)> {
        requirements
            .iter()
            .map(|req| (req.name.clone(), self.ensure(req, ui)))
            .collect()
    }

    /// Fail with [`BindupError::ModuleUnresolvable`] unless `name` is installed.
    pub fn require(&self, name: &str) -> Result<String> {
        self.pip
            .installed_version(name)
            .ok_or_else(|| BindupError::ModuleUnresolvable {
                module: name.to_string(),
            })
    }

    fn attempt(
        &self,
        requirement: &PackageRequirement,
        source: InstallSource<'_>,
        ui: &mut dyn UserInterface,
    ) -> bool {
        let inv = self.pip.install_invocation(requirement, source);
        match run_announced(self.pip.runner(), ui, &inv) {
            Ok(result) => result.success,
            Err(e) => {
                tracing::warn!("{}", e);
                false
            }
        }
    }
}
