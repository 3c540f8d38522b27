//! Host inspection.
//!
//! The prober only reads host state: the interpreter version, the installed
//! toolchain package, the distribution identity and the home directory.
//! Every lookup that fails degrades to `None`.

use std::path::{Path, PathBuf};

use crate::config::BindupConfig;
use crate::packages::PipFrontend;
use crate::shell::{CommandRunner, Invocation};
use crate::system::SystemProvisioner;

use super::snapshot::{EnvironmentSnapshot, HostFacts};
use super::version::RuntimeVersion;

/// Statement that prints the interpreter's `major.minor.patch`.
const VERSION_QUERY: &str = "import sys; print('%d.%d.%d' % sys.version_info[:3])";

/// Gathers [`HostFacts`] and assembles an [`EnvironmentSnapshot`].
pub struct EnvironmentProber<'a> {
    config: &'a BindupConfig,
    runner: &'a dyn CommandRunner,
    system: &'a dyn SystemProvisioner,
    home: Option<PathBuf>,
}

impl<'a> EnvironmentProber<'a> {
    /// Create a prober for the current user.
    pub fn new(
        config: &'a BindupConfig,
        runner: &'a dyn CommandRunner,
        system: &'a dyn SystemProvisioner,
    ) -> Self {
        Self {
            config,
            runner,
            system,
            home: dirs::home_dir(),
        }
    }

    /// Use a fixed home directory instead of the current user's.
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// Interpreter version, if the interpreter runs and answers.
    pub fn runtime_version(&self) -> Option<RuntimeVersion> {
        let inv = Invocation::new(&self.config.runtime.interpreter).args(["-c", VERSION_QUERY]);
        match self.runner.run(&inv) {
            Ok(result) if result.success => RuntimeVersion::parse(&result.stdout),
            Ok(result) => {
                tracing::debug!("interpreter exited with {:?}", result.exit_code);
                None
            }
            Err(e) => {
                tracing::debug!("{}", e);
                None
            }
        }
    }

    /// Collect raw facts without deriving anything.
    pub fn facts(&self) -> HostFacts {
        let pip = PipFrontend::new(self.runner, &self.config.runtime.interpreter);
        HostFacts {
            runtime_version: self.runtime_version(),
            installed_toolchain: pip.installed_version(&self.config.runtime.toolchain_package),
            distro: self.system.distro_identity(),
            home: self.home.clone(),
        }
    }

    /// Probe the host and assemble the snapshot for `source_dir`.
    pub fn probe(&self, source_dir: &Path) -> EnvironmentSnapshot {
        let facts = self.facts();
        tracing::debug!("host facts: {:?}", facts);
        EnvironmentSnapshot::assemble(facts, source_dir, self.config)
    }
}
