//! Post-install finalization.
//!
//! Moves the toolchain's shared libraries next to the installed binding
//! module, then imports the module in a fresh interpreter. Neither step can
//! fail the run; problems come back as warnings in [`FinalizeReport`].

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::BindupConfig;
use crate::environment::EnvironmentSnapshot;
use crate::shell::{run_announced, CommandRunner, Invocation};
use crate::ui::UserInterface;

/// Entries moved out of the toolchain library directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RelocationReport {
    pub moved: Vec<PathBuf>,
    /// Entries that could not be moved, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Result of the finalize stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizeReport {
    pub relocation: RelocationReport,
    /// Relocation was skipped because the home directory is unknown.
    pub relocation_skipped: bool,
    pub import_ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub import_output: Option<String>,
}

impl FinalizeReport {
    /// Warnings worth surfacing in the run report.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings: Vec<String> = self
            .relocation
            .failed
            .iter()
            .map(|(path, reason)| format!("could not move {}: {}", path.display(), reason))
            .collect();
        if self.relocation_skipped {
            warnings.push("library relocation skipped: home directory unknown".to_string());
        }
        if !self.import_ok {
            warnings.push("smoke import failed".to_string());
        }
        warnings
    }
}

/// Move every entry of `from` into `to`, creating `to` first.
///
/// Stops at nothing: each entry is attempted and failures are collected.
pub fn relocate_libraries(from: &Path, to: &Path) -> RelocationReport {
    let mut report = RelocationReport::default();

    let entries = match fs::read_dir(from) {
        Ok(entries) => entries,
        Err(e) => {
            report.failed.push((from.to_path_buf(), e.to_string()));
            return report;
        }
    };
    if let Err(e) = fs::create_dir_all(to) {
        report.failed.push((to.to_path_buf(), e.to_string()));
        return report;
    }

    for entry in entries.flatten() {
        let source = entry.path();
        let dest = to.join(entry.file_name());
        match move_entry(&source, &dest) {
            Ok(()) => report.moved.push(dest),
            Err(e) => report.failed.push((source, e.to_string())),
        }
    }
    report.moved.sort();
    report
}

fn move_entry(source: &Path, dest: &Path) -> io::Result<()> {
    if fs::rename(source, dest).is_ok() {
        return Ok(());
    }
    copy_entry(source, dest)?;
    if source.is_dir() && !source.is_symlink() {
        fs::remove_dir_all(source)
    } else {
        fs::remove_file(source)
    }
}

fn copy_entry(source: &Path, dest: &Path) -> io::Result<()> {
    let file_type = fs::symlink_metadata(source)?.file_type();
    if file_type.is_symlink() {
        let target = fs::read_link(source)?;
        if dest.symlink_metadata().is_ok() {
            fs::remove_file(dest)?;
        }
        #[cfg(unix)]
        std::os::unix::fs::symlink(target, dest)?;
        #[cfg(not(unix))]
        fs::copy(source.parent().unwrap_or(source).join(target), dest).map(|_| ())?;
        Ok(())
    } else if file_type.is_dir() {
        fs::create_dir_all(dest)?;
        for entry in fs::read_dir(source)? {
            let entry = entry?;
            copy_entry(&entry.path(), &dest.join(entry.file_name()))?;
        }
        Ok(())
    } else {
        fs::copy(source, dest).map(|_| ())
    }
}

/// Interpreter invocation that runs the smoke imports under `overlay`.
pub fn smoke_invocation(
    interpreter: &str,
    imports: &[String],
    overlay: &BTreeMap<String, String>,
) -> Invocation {
    Invocation::new(interpreter)
        .arg("-c")
        .arg(imports.join("\n"))
        .envs(overlay)
}

/// Relocate the toolchain libraries and smoke-import the binding module.
pub fn finalize(
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
    snapshot: &EnvironmentSnapshot,
    config: &BindupConfig,
    overlay: &BTreeMap<String, String>,
) -> FinalizeReport {
    let relocation_skipped = !snapshot.home_known;
    let relocation = if relocation_skipped {
        ui.warning("Home directory unknown; not relocating libraries");
        RelocationReport::default()
    } else {
        relocate_libraries(&snapshot.toolchain_lib_dir, &snapshot.binding_package_dir)
    };
    for (path, reason) in &relocation.failed {
        ui.warning(&format!(
            "Libraries could not be moved to {}: {}: {}",
            snapshot.binding_package_dir.display(),
            path.display(),
            reason
        ));
    }
    tracing::debug!("relocated {} entries", relocation.moved.len());

    let inv = smoke_invocation(&config.runtime.interpreter, &config.smoke_imports, overlay);
    let (import_ok, import_output) = match run_announced(runner, ui, &inv) {
        Ok(result) if result.success => (true, None),
        Ok(result) => (false, Some(result.combined_output())),
        Err(e) => (false, Some(e.to_string())),
    };

    if import_ok {
        ui.success(&format!("{} imports cleanly", config.runtime.binding_package));
    } else {
        ui.warning(&format!(
            "Required module '{}' could not be imported",
            config.runtime.binding_package
        ));
    }

    FinalizeReport {
        relocation,
        relocation_skipped,
        import_ok,
        import_output,
    }
}
