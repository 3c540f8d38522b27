//! Acquisition of the versioned toolchain bundle.

use crate::config::BindupConfig;
use crate::environment::EnvironmentSnapshot;
use crate::shell::{run_announced, CommandRunner, Invocation};
use crate::ui::UserInterface;

/// Program that fetches toolchain bundles.
pub const ACQUISITION_TOOL: &str = "aqt";

/// Result of making sure the toolchain bundle is on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The versioned bundle was already there.
    Present,
    /// The bundle was fetched.
    Fetched,
    /// The acquisition tool failed or could not be started.
    Failed(String),
}

/// Command that fetches the bundle for the snapshot's toolchain version.
pub fn acquisition_invocation(snapshot: &EnvironmentSnapshot, config: &BindupConfig) -> Invocation {
    let settings = &config.toolchain;
    Invocation::new(ACQUISITION_TOOL)
        .arg("install-qt")
        .arg("--outputdir")
        .arg(snapshot.toolchain_dir.display().to_string())
        .arg("--base")
        .arg(&settings.base_url)
        .args([
            settings.host.as_str(),
            settings.target.as_str(),
            snapshot.toolchain.version.as_str(),
        ])
}

/// Fetch the bundle unless its versioned root already exists.
pub fn ensure_toolchain(
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
    snapshot: &EnvironmentSnapshot,
    config: &BindupConfig,
) -> FetchOutcome {
    if snapshot.toolchain_root.is_dir() {
        tracing::debug!("toolchain present at {}", snapshot.toolchain_root.display());
        return FetchOutcome::Present;
    }

    let inv = acquisition_invocation(snapshot, config);
    match run_announced(runner, ui, &inv) {
        Ok(result) if result.success => FetchOutcome::Fetched,
        Ok(result) => FetchOutcome::Failed(format!(
            "{} exited with {:?}",
            ACQUISITION_TOOL, result.exit_code
        )),
        Err(e) => FetchOutcome::Failed(e.to_string()),
    }
}
