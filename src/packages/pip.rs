//! Front-end for the interpreter's package manager.
//!
//! Presence checks run `<interpreter> -m pip show <name>` and read the
//! `Version:` field. A package that is not installed yields `None`; so does
//! an interpreter that cannot be started.

use crate::config::MirrorSettings;
use crate::shell::{CommandRunner, Invocation};

use super::requirement::PackageRequirement;

/// Flag that lets installs proceed in externally-managed environments.
pub const ISOLATION_FLAG: &str = "--break-system-packages";

/// Where an install pulls packages from.
#[derive(Debug, Clone, Copy)]
pub enum InstallSource<'a> {
    /// The package manager's default index.
    Primary,
    /// The configured mirror, with its host trusted.
    Mirror(&'a MirrorSettings),
}

/// Thin wrapper over `<interpreter> -m pip`.
pub struct PipFrontend<'a> {
    runner: &'a dyn CommandRunner,
    interpreter: String,
}

impl<'a> PipFrontend<'a> {
    /// Create a front-end for the given interpreter.
    pub fn new(runner: &'a dyn CommandRunner, interpreter: &str) -> Self {
        Self {
            runner,
            interpreter: interpreter.to_string(),
        }
    }

    fn pip(&self) -> Invocation {
        Invocation::new(&self.interpreter).args(["-m", "pip"])
    }

    /// Installed version of `name`, if any.
    pub fn installed_version(&self, name: &str) -> Option<String> {
        let inv = self.pip().args(["show", name]);
        match self.runner.run(&inv) {
            Ok(result) if result.success => parse_show_version(&result.stdout),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!("package lookup for {} failed: {}", name, e);
                None
            }
        }
    }

    /// Build the install invocation for a requirement.
    pub fn install_invocation(
        &self,
        requirement: &PackageRequirement,
        source: InstallSource<'_>,
    ) -> Invocation {
        let mut inv = self
            .pip()
            .arg("install")
            .arg(requirement.specifier())
            .args(requirement.extra_args.iter().cloned())
            .arg(ISOLATION_FLAG);

        if let InstallSource::Mirror(mirror) = source {
            inv = inv
                .arg(format!("--index-url={}", mirror.index_url))
                .arg("--trusted-host")
                .arg(&mirror.trusted_host);
        }
        inv
    }

    /// The underlying runner.
    pub fn runner(&self) -> &'a dyn CommandRunner {
        self.runner
    }
}

/// Extract the `Version:` field from `pip show` output.
pub fn parse_show_version(stdout: &str) -> Option<String> {
    stdout.lines().find_map(|line| {
        let value = line.strip_prefix("Version:")?.trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}
