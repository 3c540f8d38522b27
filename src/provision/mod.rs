//! Distribution-specific provisioning.
//!
//! For a recognised distribution this installs the profile's native
//! packages in one batch, unpacks the crypto shim when the toolchain needs
//! it, and repairs the config-tool symlink. Unrecognised distributions get a
//! warning and nothing else; an existing symlink is left as it is.

pub mod profile;
pub mod shim;
pub mod symlink;

pub use profile::{lookup, DistroProfile, ProfileLookup, PROFILES};
pub use shim::{shim_required, unpack_shim};
pub use symlink::{LinkAction, RepairOutcome, SymlinkRepair};

use crate::config::BindupConfig;
use crate::environment::EnvironmentSnapshot;
use crate::shell::{is_elevated, CommandRunner};
use crate::system::SystemProvisioner;
use crate::ui::UserInterface;

/// What happened to the crypto shim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShimStatus {
    /// The toolchain version does not need it.
    NotNeeded,
    /// Unpacked this many archive entries.
    Unpacked(usize),
    /// Unpacking failed.
    Failed(String),
}

/// Everything `provision` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Profile lookup result.
    pub lookup: ProfileLookup,
    /// Native packages passed to the package manager (empty when skipped).
    pub native_packages: Vec<String>,
    /// Whether the native install succeeded; `None` when none ran.
    pub native_install_ok: Option<bool>,
    /// Crypto shim handling; `None` for unrecognised distributions.
    pub shim: Option<ShimStatus>,
    /// Symlink repair; `None` when the link was left untouched.
    pub symlink: Option<RepairOutcome>,
}

impl ProvisionReport {
    /// Human-readable failures, empty when provisioning fully succeeded.
    pub fn failures(&self) -> Vec<String> {
        let mut failures = Vec::new();
        if self.native_install_ok == Some(false) {
            failures.push("native package install failed".to_string());
        }
        if let Some(ShimStatus::Failed(message)) = &self.shim {
            failures.push(format!("crypto shim: {}", message));
        }
        match self.symlink.as_ref().map(|s| &s.action) {
            Some(LinkAction::TargetMissing) => {
                failures.push("config tool target is missing".to_string())
            }
            Some(LinkAction::Failed(message)) => failures.push(format!("symlink: {}", message)),
            _ => {}
        }
        failures
    }

    /// Non-fatal problems: an untested distribution, or a config-tool link
    /// that was left pointing somewhere other than the resolved tool.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings: Vec<String> = self.lookup.warning().into_iter().collect();
        if let Some(LinkAction::PointsElsewhere(raw)) = self.symlink.as_ref().map(|s| &s.action) {
            warnings.push(format!("config tool link points at {}", raw.display()));
        }
        warnings
    }

    /// Whether the distribution was recognised.
    pub fn recognised(&self) -> bool {
        self.lookup.profile().is_some()
    }
}

/// Applies the distribution profile to the host.
pub struct Provisioner<'a> {
    config: &'a BindupConfig,
    runner: &'a dyn CommandRunner,
    system: &'a dyn SystemProvisioner,
    elevated: bool,
}

impl<'a> Provisioner<'a> {
    /// Create a provisioner for the current process.
    pub fn new(
        config: &'a BindupConfig,
        runner: &'a dyn CommandRunner,
        system: &'a dyn SystemProvisioner,
    ) -> Self {
        Self {
            config,
            runner,
            system,
            elevated: is_elevated(),
        }
    }

    /// Override the detected elevation state.
    pub fn with_elevation(mut self, elevated: bool) -> Self {
        self.elevated = elevated;
        self
    }

    /// Provision the host described by `snapshot`.
    pub fn provision(
        &self,
        snapshot: &EnvironmentSnapshot,
        ui: &mut dyn UserInterface,
    ) -> ProvisionReport {
        let found = lookup(&snapshot.distro);
        let Some(profile) = found.profile() else {
            if let Some(warning) = found.warning() {
                ui.warning(&warning);
            }
            return ProvisionReport {
                lookup: found,
                native_packages: Vec::new(),
                native_install_ok: None,
                shim: None,
                symlink: None,
            };
        };

        let native_packages = profile.native_packages();
        let native_install_ok = match self.system.install_native(&native_packages, ui) {
            Ok(result) => result.success,
            Err(e) => {
                ui.error(&e.to_string());
                false
            }
        };

        let shim = self.apply_shim(snapshot, ui);

        let target = profile.config_tool(&self.config.symlink.target_prefix);
        let repair = SymlinkRepair::new(&self.config.symlink.link, target);
        let symlink = repair.reconcile(self.runner, ui, self.elevated);

        ProvisionReport {
            lookup: found,
            native_packages,
            native_install_ok: Some(native_install_ok),
            shim: Some(shim),
            symlink: Some(symlink),
        }
    }

    fn apply_shim(&self, snapshot: &EnvironmentSnapshot, ui: &mut dyn UserInterface) -> ShimStatus {
        let settings = &self.config.toolchain;
        if !shim_required(&snapshot.toolchain.version, &settings.crypto_shim_min_version) {
            return ShimStatus::NotNeeded;
        }

        let archive = snapshot.source_dir.join(&settings.crypto_shim_archive);
        match unpack_shim(&archive, &snapshot.runtime_lib_dir()) {
            Ok(count) => ShimStatus::Unpacked(count),
            Err(e) => {
                ui.warning(&e.to_string());
                ShimStatus::Failed(e.to_string())
            }
        }
    }
}
