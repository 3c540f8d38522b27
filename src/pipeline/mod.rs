//! The provisioning pipeline.
//!
//! Stages run strictly in order: probe, dependencies, toolchain, provision,
//! build, finalize. Each yields a [`StageOutcome`]; the configured
//! [`FailurePolicy`] decides whether later stages still run after a failure.
//! The only error that stops a run outright is an unresolvable acquisition
//! package after dependency reconciliation.

pub mod report;

pub use report::{ProvisioningReport, Stage, StageOutcome, StageStatus, EXIT_STAGE_FAILED};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::build::{default_jobs, library_path_overlay, BuildOrchestrator};
use crate::config::{BindupConfig, FailurePolicy};
use crate::environment::{EnvironmentProber, EnvironmentSnapshot, ProcessEnv};
use crate::error::Result;
use crate::finalize::finalize;
use crate::packages::{
    ensure_toolchain, required_packages, FetchOutcome, PipFrontend, Reconciler,
    ACQUISITION_PACKAGE,
};
use crate::provision::Provisioner;
use crate::shell::{is_elevated, CommandRunner};
use crate::system::SystemProvisioner;
use crate::ui::UserInterface;

/// One configured provisioning run.
pub struct Pipeline<'a> {
    config: &'a BindupConfig,
    runner: &'a dyn CommandRunner,
    system: &'a dyn SystemProvisioner,
    env: &'a ProcessEnv,
    source_dir: PathBuf,
    home: Option<PathBuf>,
    elevated: bool,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline for `source_dir` on the current host.
    pub fn new(
        config: &'a BindupConfig,
        runner: &'a dyn CommandRunner,
        system: &'a dyn SystemProvisioner,
        env: &'a ProcessEnv,
        source_dir: &Path,
    ) -> Self {
        Self {
            config,
            runner,
            system,
            env,
            source_dir: source_dir.to_path_buf(),
            home: dirs::home_dir(),
            elevated: is_elevated(),
        }
    }

    /// Use a fixed home directory.
    pub fn with_home(mut self, home: Option<PathBuf>) -> Self {
        self.home = home;
        self
    }

    /// Override the detected elevation state.
    pub fn with_elevation(mut self, elevated: bool) -> Self {
        self.elevated = elevated;
        self
    }

    /// Probe the host without changing anything.
    pub fn probe(&self) -> EnvironmentSnapshot {
        EnvironmentProber::new(self.config, self.runner, self.system)
            .with_home(self.home.clone())
            .probe(&self.source_dir)
    }

    /// Run every stage and return the report.
    pub fn run(&self, ui: &mut dyn UserInterface) -> Result<ProvisioningReport> {
        let mut report = ProvisioningReport::new();

        ui.show_header(Stage::Probe.title());
        let snapshot = self.probe();
        snapshot.print_info(ui);
        report.push(probe_outcome(&snapshot));
        report.environment = Some(snapshot.clone());

        let overlay = library_path_overlay(
            self.env,
            &self.config.library_path_var,
            &snapshot.toolchain_lib_dir,
        );

        for stage in &Stage::ALL[1..] {
            if self.halted(&report) {
                report.push(StageOutcome::skipped(*stage));
                continue;
            }
            if *stage != Stage::Build {
                ui.show_header(stage.title());
            }
            let outcome = match stage {
                Stage::Dependencies => self.dependencies(&snapshot, ui)?,
                Stage::Toolchain => self.toolchain(&snapshot, ui),
                Stage::Provision => self.provision(&snapshot, ui),
                Stage::Build => self.build(&snapshot, &overlay, ui),
                Stage::Finalize => self.finalize(&snapshot, &overlay, ui),
                Stage::Probe => continue,
            };
            tracing::debug!("stage {} {}", outcome.stage, outcome.status);
            report.push(outcome);
        }

        report.finish();
        Ok(report)
    }

    fn halted(&self, report: &ProvisioningReport) -> bool {
        self.config.policy.on_failure == FailurePolicy::Abort && report.has_failures()
    }

    fn dependencies(
        &self,
        snapshot: &EnvironmentSnapshot,
        ui: &mut dyn UserInterface,
    ) -> Result<StageOutcome> {
        let pip = PipFrontend::new(self.runner, &self.config.runtime.interpreter);
        let reconciler = Reconciler::new(pip, &self.config.mirror);

        let required = required_packages(&snapshot.toolchain.version, self.config);
        let failures: Vec<String> = reconciler
            .ensure_all(&required, ui)
            .into_iter()
            .filter(|(_, outcome)| !outcome.is_satisfied())
            .map(|(name, _)| format!("{} could not be installed", name))
            .collect();

        reconciler.require(ACQUISITION_PACKAGE)?;

        Ok(StageOutcome::from_problems(Stage::Dependencies, failures, Vec::new()))
    }

    fn toolchain(
        &self,
        snapshot: &EnvironmentSnapshot,
        ui: &mut dyn UserInterface,
    ) -> StageOutcome {
        match ensure_toolchain(self.runner, ui, snapshot, self.config) {
            FetchOutcome::Present | FetchOutcome::Fetched => {
                StageOutcome::succeeded(Stage::Toolchain)
            }
            FetchOutcome::Failed(reason) => StageOutcome::failed(Stage::Toolchain, vec![reason]),
        }
    }

    fn provision(
        &self,
        snapshot: &EnvironmentSnapshot,
        ui: &mut dyn UserInterface,
    ) -> StageOutcome {
        let provisioned = Provisioner::new(self.config, self.runner, self.system)
            .with_elevation(self.elevated)
            .provision(snapshot, ui);

        StageOutcome::from_problems(
            Stage::Provision,
            provisioned.failures(),
            provisioned.warnings(),
        )
    }

    fn build(
        &self,
        snapshot: &EnvironmentSnapshot,
        overlay: &BTreeMap<String, String>,
        ui: &mut dyn UserInterface,
    ) -> StageOutcome {
        let jobs = self.config.build.jobs.unwrap_or_else(default_jobs);
        let built = BuildOrchestrator::new(self.runner, &self.config.build.tool, jobs)
            .with_policy(self.config.policy.on_failure)
            .run(snapshot, overlay, ui);

        let mut failures: Vec<String> = built.clear_error.iter().cloned().collect();
        failures.extend(
            built
                .steps
                .iter()
                .filter(|s| s.status == crate::build::StepStatus::Failed)
                .map(|s| format!("{} failed", s.stage)),
        );
        let output = built.steps.iter().find_map(|s| s.output.clone());

        StageOutcome::from_problems(Stage::Build, failures, Vec::new())
            .with_output(output)
            .with_steps(built.steps)
    }

    fn finalize(
        &self,
        snapshot: &EnvironmentSnapshot,
        overlay: &BTreeMap<String, String>,
        ui: &mut dyn UserInterface,
    ) -> StageOutcome {
        let finalized = finalize(self.runner, ui, snapshot, self.config, overlay);
        StageOutcome::from_problems(Stage::Finalize, Vec::new(), finalized.warnings())
            .with_output(finalized.import_output)
    }
}

fn probe_outcome(snapshot: &EnvironmentSnapshot) -> StageOutcome {
    let mut warnings = Vec::new();
    if snapshot.runtime_version.is_none() {
        warnings.push("interpreter version unknown; using baseline toolchain".to_string());
    }
    if snapshot.distro.id.is_none() {
        warnings.push("distribution unknown".to_string());
    }
    if !snapshot.home_known {
        warnings.push("home directory unknown; libraries will not be relocated".to_string());
    }
    StageOutcome::from_problems(Stage::Probe, Vec::new(), warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BindupError;
    use crate::shell::{MockResponse, MockRunner};
    use crate::system::MockSystem;
    use crate::ui::MockUI;

    const VERSION_QUERY: &str = "python3 -c import sys";

    struct Host {
        temp: tempfile::TempDir,
        config: BindupConfig,
        runner: MockRunner,
        env: ProcessEnv,
    }

    fn host() -> Host {
        let temp = tempfile::tempdir().unwrap();
        let mut config = BindupConfig::default();
        config.symlink.link = temp.path().join("llvm-config");
        config.symlink.target_prefix = format!("{}/llvm-config-", temp.path().display());
        config.build.jobs = Some(2);

        let runner = MockRunner::new();
        runner.on(VERSION_QUERY, MockResponse::ok("3.11.4\n"));
        runner.on("python3 -m pip show", MockResponse::ok("Version: 1.0\n"));
        runner.on("python3 -m pip show PySide6", MockResponse::fail(1, ""));

        Host {
            temp,
            config,
            runner,
            env: ProcessEnv::empty(),
        }
    }

    fn run(host: &Host, system: &MockSystem) -> (Result<ProvisioningReport>, MockUI) {
        let mut ui = MockUI::new();
        let result = Pipeline::new(&host.config, &host.runner, system, &host.env, host.temp.path())
            .with_home(Some(host.temp.path().join("home")))
            .with_elevation(false)
            .run(&mut ui);
        (result, ui)
    }

    #[test]
    fn all_stages_are_reported_in_order() {
        let host = host();
        let system = MockSystem::new("fedora", "40");

        let (result, ui) = run(&host, &system);
        let report = result.unwrap();

        let stages: Vec<Stage> = report.stages.iter().map(|o| o.stage).collect();
        assert_eq!(stages, Stage::ALL);
        assert_eq!(report.status_of(Stage::Provision), Some(StageStatus::Warning));
        assert!(report.finished_at.is_some());
        assert!(ui.has_header("Gain system info"));
    }

    #[test]
    fn continue_policy_runs_past_failures() {
        let host = host();
        host.runner.on("aqt", MockResponse::fail(1, "network down"));
        let system = MockSystem::new("fedora", "40");

        let report = run(&host, &system).0.unwrap();

        assert_eq!(report.status_of(Stage::Toolchain), Some(StageStatus::Failed));
        assert_eq!(report.status_of(Stage::Build), Some(StageStatus::Succeeded));
        assert_eq!(report.exit_code(false), 0);
        assert_eq!(report.exit_code(true), EXIT_STAGE_FAILED);
    }

    #[test]
    fn abort_policy_skips_after_failure() {
        let mut host = host();
        host.config.policy.on_failure = FailurePolicy::Abort;
        host.runner.on("aqt", MockResponse::fail(1, "network down"));
        let system = MockSystem::new("debian", "12");

        let report = run(&host, &system).0.unwrap();

        assert_eq!(report.status_of(Stage::Provision), Some(StageStatus::Skipped));
        assert_eq!(report.status_of(Stage::Build), Some(StageStatus::Skipped));
        assert_eq!(report.status_of(Stage::Finalize), Some(StageStatus::Skipped));
        assert!(system.installs().is_empty());
        assert_eq!(host.runner.count("cmake"), 0);
    }

    #[test]
    fn unresolvable_acquisition_package_stops_the_run() {
        let host = host();
        host.runner.on("python3 -m pip show aqtinstall", MockResponse::fail(1, ""));
        host.runner.on("python3 -m pip install aqtinstall", MockResponse::fail(1, ""));
        let system = MockSystem::new("debian", "12");

        let (result, _) = run(&host, &system);

        assert!(matches!(result, Err(BindupError::ModuleUnresolvable { .. })));
        assert_eq!(host.runner.count("cmake"), 0);
    }

    #[test]
    fn build_failure_carries_step_outcomes() {
        let host = host();
        host.runner.on("cmake --build", MockResponse::fail(2, "ld: cannot find -lQt6Core"));
        let system = MockSystem::new("fedora", "40");

        let report = run(&host, &system).0.unwrap();

        let build = report.outcome(Stage::Build).unwrap();
        assert_eq!(build.status, StageStatus::Failed);
        assert_eq!(build.steps.len(), 3);
        assert!(build.output.as_deref().unwrap().contains("cannot find"));
        assert_eq!(report.status_of(Stage::Finalize), Some(StageStatus::Warning));
    }

    #[test]
    fn unknown_home_is_a_probe_warning() {
        let facts = crate::environment::HostFacts {
            runtime_version: Some(crate::environment::RuntimeVersion::new(3, 11, 4)),
            installed_toolchain: None,
            distro: crate::environment::DistroIdentity::new("debian", "12"),
            home: None,
        };
        let snapshot = EnvironmentSnapshot::assemble(
            facts,
            std::path::Path::new("/src"),
            &BindupConfig::default(),
        );

        let outcome = probe_outcome(&snapshot);

        assert_eq!(outcome.status, StageStatus::Warning);
        assert_eq!(
            outcome.details,
            ["home directory unknown; libraries will not be relocated"]
        );
    }
}
