//! Build orchestration.
//!
//! The build directory is recreated, then configure, compile and install run
//! in order, each as one blocking invocation of the build tool with the
//! library-path overlay applied. Each stage is guarded on its own: a failure
//! is recorded as a [`StepOutcome`] and, under [`FailurePolicy::Continue`],
//! the next stage still runs.

pub mod env;
pub mod stage;

pub use env::{default_jobs, jobs_for, library_path_overlay};
pub use stage::BuildStage;

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use crate::config::FailurePolicy;
use crate::environment::EnvironmentSnapshot;
use crate::error::Result;
use crate::shell::{run_announced, CommandRunner};
use crate::ui::UserInterface;

/// Status of one build stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Succeeded,
    Failed,
    Skipped,
}

/// Result of one build stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub stage: BuildStage,
    pub status: StepStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exit_code: Option<i32>,
    #[serde(with = "duration_ms")]
    pub duration: Duration,
    /// Error or captured tool output, for failed stages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl StepOutcome {
    fn skipped(stage: BuildStage) -> Self {
        Self {
            stage,
            status: StepStatus::Skipped,
            exit_code: None,
            duration: Duration::ZERO,
            output: None,
        }
    }
}

/// Result of a whole build run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Error from recreating the build directory, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear_error: Option<String>,
    pub steps: Vec<StepOutcome>,
}

impl BuildReport {
    /// Whether the directory was recreated and every stage succeeded.
    pub fn succeeded(&self) -> bool {
        self.clear_error.is_none() && self.steps.iter().all(|s| s.status == StepStatus::Succeeded)
    }
}

/// Runs the build stages against one snapshot.
pub struct BuildOrchestrator<'a> {
    runner: &'a dyn CommandRunner,
    tool: String,
    jobs: usize,
    policy: FailurePolicy,
}

impl<'a> BuildOrchestrator<'a> {
    /// Create an orchestrator using `tool` with `jobs` parallel compile jobs.
    pub fn new(runner: &'a dyn CommandRunner, tool: &str, jobs: usize) -> Self {
        Self {
            runner,
            tool: tool.to_string(),
            jobs,
            policy: FailurePolicy::Continue,
        }
    }

    /// Choose what happens after a failed stage.
    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Recreate the build directory and run every stage.
    pub fn run(
        &self,
        snapshot: &EnvironmentSnapshot,
        overlay: &BTreeMap<String, String>,
        ui: &mut dyn UserInterface,
    ) -> BuildReport {
        ui.show_header("Clear build directory");
        let clear_error = match clear_build_dir(&snapshot.build_dir) {
            Ok(()) => None,
            Err(e) => {
                ui.error(&e.to_string());
                Some(e.to_string())
            }
        };
        let mut halted = clear_error.is_some() && self.policy == FailurePolicy::Abort;

        ui.show_header("Build module");
        for (key, value) in overlay {
            ui.message(&format!("info: using {}: {}", key, value));
        }

        let mut steps = Vec::with_capacity(BuildStage::ALL.len());
        for stage in BuildStage::ALL {
            if halted {
                steps.push(StepOutcome::skipped(stage));
                continue;
            }
            if stage == BuildStage::Install {
                ui.show_header("Install module");
            }
            let outcome = self.run_stage(stage, snapshot, overlay, ui);
            if outcome.status == StepStatus::Failed && self.policy == FailurePolicy::Abort {
                halted = true;
            }
            steps.push(outcome);
        }

        BuildReport { clear_error, steps }
    }

    fn run_stage(
        &self,
        stage: BuildStage,
        snapshot: &EnvironmentSnapshot,
        overlay: &BTreeMap<String, String>,
        ui: &mut dyn UserInterface,
    ) -> StepOutcome {
        let inv = stage
            .invocation(&self.tool, snapshot, self.jobs)
            .envs(overlay);

        match run_announced(self.runner, ui, &inv) {
            Ok(result) => StepOutcome {
                stage,
                status: if result.success {
                    StepStatus::Succeeded
                } else {
                    StepStatus::Failed
                },
                exit_code: result.exit_code,
                duration: result.duration,
                output: (!result.success).then(|| result.combined_output()),
            },
            Err(e) => {
                ui.error(&e.to_string());
                StepOutcome {
                    stage,
                    status: StepStatus::Failed,
                    exit_code: None,
                    duration: Duration::ZERO,
                    output: Some(e.to_string()),
                }
            }
        }
    }
}

/// Remove `dir` if present and create it empty.
pub fn clear_build_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    Ok(())
}

mod duration_ms {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }
}
