//! Repair of the unversioned config-tool symlink.
//!
//! Discovery tools only look for the unversioned name, so after provisioning
//! the link must exist, must not be broken, and must point at an existing
//! target. Every mutation is tried unprivileged first and retried through the
//! elevation program on failure.

use std::io;
use std::path::{Path, PathBuf};

use crate::shell::{privileged_with, run_announced, CommandRunner, Invocation};
use crate::ui::UserInterface;

/// What happened to the link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// The link already pointed at the target.
    AlreadyCorrect,
    /// A non-link file was already in place and left alone.
    KeptExisting,
    /// A valid link to another target was left alone.
    PointsElsewhere(PathBuf),
    /// The link was created.
    Created,
    /// The link was created through the elevation program.
    CreatedElevated,
    /// The target does not exist, so no link was created.
    TargetMissing,
    /// The link could not be removed or created.
    Failed(String),
}

impl LinkAction {
    /// Whether the link satisfies the post-provisioning invariant.
    pub fn is_ok(&self) -> bool {
        !matches!(self, LinkAction::TargetMissing | LinkAction::Failed(_))
    }
}

/// Result of [`SymlinkRepair::reconcile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairOutcome {
    /// A broken link was removed first.
    pub removed_broken: bool,
    /// The final action.
    pub action: LinkAction,
}

/// A link that must point at `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymlinkRepair {
    pub link: PathBuf,
    pub target: PathBuf,
}

impl SymlinkRepair {
    pub fn new(link: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            link: link.into(),
            target: target.into(),
        }
    }

    /// Bring the link in line with the target.
    ///
    /// `elevated` tells whether retries can run directly or need the
    /// elevation program.
    pub fn reconcile(
        &self,
        runner: &dyn CommandRunner,
        ui: &mut dyn UserInterface,
        elevated: bool,
    ) -> RepairOutcome {
        let mut removed_broken = false;

        if let Some(dangling) = self.broken_target() {
            ui.message(&format!(
                "Remove broken symlink {} -> {}",
                self.link.display(),
                dangling.display()
            ));
            if let Err(message) = self.remove_link(runner, ui, elevated) {
                return RepairOutcome {
                    removed_broken,
                    action: LinkAction::Failed(message),
                };
            }
            removed_broken = true;
        }

        RepairOutcome {
            removed_broken,
            action: self.ensure_link(runner, ui, elevated),
        }
    }

    /// Where the link points, if it is a symlink whose target is missing.
    fn broken_target(&self) -> Option<PathBuf> {
        let raw = std::fs::read_link(&self.link).ok()?;
        let resolved = resolve_relative(&self.link, &raw);
        (!resolved.exists()).then_some(resolved)
    }

    fn remove_link(
        &self,
        runner: &dyn CommandRunner,
        ui: &mut dyn UserInterface,
        elevated: bool,
    ) -> Result<(), String> {
        match std::fs::remove_file(&self.link) {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::debug!("unprivileged removal failed: {}", e);
                let inv = Invocation::new("rm").arg(self.link.display().to_string());
                self.run_privileged(runner, ui, inv, elevated)
            }
        }
    }

    fn ensure_link(
        &self,
        runner: &dyn CommandRunner,
        ui: &mut dyn UserInterface,
        elevated: bool,
    ) -> LinkAction {
        if let Ok(raw) = std::fs::read_link(&self.link) {
            if raw == self.target || resolve_relative(&self.link, &raw) == self.target {
                return LinkAction::AlreadyCorrect;
            }
            ui.warning(&format!(
                "{} points at {}, not {}; leaving it",
                self.link.display(),
                raw.display(),
                self.target.display()
            ));
            return LinkAction::PointsElsewhere(raw);
        }
        if self.link.symlink_metadata().is_ok() {
            ui.message(&format!("{} already exists", self.link.display()));
            return LinkAction::KeptExisting;
        }

        if !self.target.exists() {
            ui.warning(&format!(
                "{} does not exist; not linking {}",
                self.target.display(),
                self.link.display()
            ));
            return LinkAction::TargetMissing;
        }

        match create_symlink(&self.target, &self.link) {
            Ok(()) => LinkAction::Created,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                ui.message("The symlink already exists");
                LinkAction::KeptExisting
            }
            Err(e) => {
                tracing::debug!("unprivileged symlink failed: {}", e);
                ui.message(&format!("Creating symlink '{}'", self.link.display()));
                let inv = Invocation::new("ln").args([
                    "-s".to_string(),
                    self.target.display().to_string(),
                    self.link.display().to_string(),
                ]);
                match self.run_privileged(runner, ui, inv, elevated) {
                    Ok(()) => LinkAction::CreatedElevated,
                    Err(message) => LinkAction::Failed(message),
                }
            }
        }
    }

    fn run_privileged(
        &self,
        runner: &dyn CommandRunner,
        ui: &mut dyn UserInterface,
        inv: Invocation,
        elevated: bool,
    ) -> Result<(), String> {
        let inv = privileged_with(inv, elevated);
        match run_announced(runner, ui, &inv) {
            Ok(result) if result.success => Ok(()),
            Ok(result) => Err(format!(
                "'{}' exited with {:?}",
                inv.display(),
                result.exit_code
            )),
            Err(e) => Err(e.to_string()),
        }
    }
}

/// Resolve a link's raw target against the link's directory.
fn resolve_relative(link: &Path, raw: &Path) -> PathBuf {
    if raw.is_absolute() {
        raw.to_path_buf()
    } else {
        link.parent()
            .map(|dir| dir.join(raw))
            .unwrap_or_else(|| raw.to_path_buf())
    }
}

#[cfg(unix)]
fn create_symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(not(unix))]
fn create_symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "symlinks are only managed on unix hosts",
    ))
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::shell::{MockResponse, MockRunner};
    use crate::ui::MockUI;
    use std::os::unix::fs::symlink;

    struct Fixture {
        _temp: tempfile::TempDir,
        link: PathBuf,
        target: PathBuf,
    }

    fn fixture() -> Fixture {
        let temp = tempfile::tempdir().unwrap();
        let link = temp.path().join("llvm-config");
        let target = temp.path().join("llvm-config-18");
        std::fs::write(&target, "#!/bin/sh\n").unwrap();
        Fixture {
            link,
            target,
            _temp: temp,
        }
    }

    fn reconcile(repair: &SymlinkRepair, runner: &MockRunner) -> RepairOutcome {
        let mut ui = MockUI::new();
        repair.reconcile(runner, &mut ui, false)
    }

    #[test]
    fn creates_missing_link() {
        let f = fixture();
        let runner = MockRunner::new();

        let outcome = reconcile(&SymlinkRepair::new(&f.link, &f.target), &runner);

        assert_eq!(outcome.action, LinkAction::Created);
        assert!(!outcome.removed_broken);
        assert_eq!(std::fs::read_link(&f.link).unwrap(), f.target);
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn replaces_broken_link() {
        let f = fixture();
        symlink(f.link.with_file_name("llvm-config-11"), &f.link).unwrap();
        let runner = MockRunner::new();

        let outcome = reconcile(&SymlinkRepair::new(&f.link, &f.target), &runner);

        assert!(outcome.removed_broken);
        assert_eq!(outcome.action, LinkAction::Created);
        assert_eq!(std::fs::read_link(&f.link).unwrap(), f.target);
        assert!(f.link.exists());
    }

    #[test]
    fn correct_link_is_not_touched() {
        let f = fixture();
        symlink(&f.target, &f.link).unwrap();
        let before = f.link.symlink_metadata().unwrap().modified().unwrap();
        let runner = MockRunner::new();

        let outcome = reconcile(&SymlinkRepair::new(&f.link, &f.target), &runner);

        assert_eq!(outcome.action, LinkAction::AlreadyCorrect);
        assert!(!outcome.removed_broken);
        let after = f.link.symlink_metadata().unwrap().modified().unwrap();
        assert_eq!(before, after);
        assert!(runner.commands().is_empty());
    }

    #[test]
    fn relative_correct_link_is_recognised() {
        let f = fixture();
        symlink("llvm-config-18", &f.link).unwrap();
        let runner = MockRunner::new();

        let outcome = reconcile(&SymlinkRepair::new(&f.link, &f.target), &runner);
        assert_eq!(outcome.action, LinkAction::AlreadyCorrect);
    }

    #[test]
    fn valid_link_elsewhere_is_kept_with_warning() {
        let f = fixture();
        let other = f.link.with_file_name("llvm-config-14");
        std::fs::write(&other, "").unwrap();
        symlink(&other, &f.link).unwrap();
        let runner = MockRunner::new();
        let mut ui = MockUI::new();

        let outcome = SymlinkRepair::new(&f.link, &f.target).reconcile(&runner, &mut ui, false);

        assert_eq!(outcome.action, LinkAction::PointsElsewhere(other.clone()));
        assert!(outcome.action.is_ok());
        assert_eq!(std::fs::read_link(&f.link).unwrap(), other);
        assert!(ui.has_warning("llvm-config-14"));
    }

    #[test]
    fn missing_target_is_not_linked() {
        let f = fixture();
        let missing = f.target.with_file_name("llvm-config-99");
        let runner = MockRunner::new();

        let outcome = reconcile(&SymlinkRepair::new(&f.link, &missing), &runner);

        assert_eq!(outcome.action, LinkAction::TargetMissing);
        assert!(!outcome.action.is_ok());
        assert!(f.link.symlink_metadata().is_err());
    }

    #[test]
    fn creation_error_retries_elevated() {
        let f = fixture();
        let link = f.link.with_file_name("no-such-dir").join("llvm-config");
        let runner = MockRunner::new();

        let outcome = reconcile(&SymlinkRepair::new(&link, &f.target), &runner);

        assert_eq!(outcome.action, LinkAction::CreatedElevated);
        assert_eq!(runner.count("sudo ln -s"), 1);
    }

    #[test]
    fn failed_elevated_retry_is_reported() {
        let f = fixture();
        let link = f.link.with_file_name("no-such-dir").join("llvm-config");
        let runner = MockRunner::new();
        runner.on("sudo ln", MockResponse::fail(1, "permission denied"));

        let outcome = reconcile(&SymlinkRepair::new(&link, &f.target), &runner);
        assert!(matches!(outcome.action, LinkAction::Failed(_)));
    }
}
