//! Per-stage outcomes and the aggregated provisioning report.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::build::StepOutcome;
use crate::environment::EnvironmentSnapshot;
use crate::ui::UserInterface;

/// Exit code when a stage failed and strict exit is on.
pub const EXIT_STAGE_FAILED: u8 = 3;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Probe,
    Dependencies,
    Toolchain,
    Provision,
    Build,
    Finalize,
}

impl Stage {
    /// Every stage, in execution order.
    pub const ALL: [Stage; 6] = [
        Stage::Probe,
        Stage::Dependencies,
        Stage::Toolchain,
        Stage::Provision,
        Stage::Build,
        Stage::Finalize,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Stage::Probe => "probe",
            Stage::Dependencies => "dependencies",
            Stage::Toolchain => "toolchain",
            Stage::Provision => "provision",
            Stage::Build => "build",
            Stage::Finalize => "finalize",
        }
    }

    /// Banner shown before the stage runs.
    pub fn title(&self) -> &'static str {
        match self {
            Stage::Probe => "Gain system info",
            Stage::Dependencies => "Check / install language packages",
            Stage::Toolchain => "Check / install toolchain bundle",
            Stage::Provision => "Check / install native packages",
            Stage::Build => "Build",
            Stage::Finalize => "Finalize install",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// How a stage ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Succeeded,
    /// Completed, but something degraded.
    Warning,
    Failed,
    /// Not run because an earlier stage failed under the abort policy.
    Skipped,
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StageStatus::Succeeded => "succeeded",
            StageStatus::Warning => "warning",
            StageStatus::Failed => "failed",
            StageStatus::Skipped => "skipped",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of one pipeline stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageOutcome {
    pub stage: Stage,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<StepOutcome>,
}

impl StageOutcome {
    fn with_status(stage: Stage, status: StageStatus, details: Vec<String>) -> Self {
        Self {
            stage,
            status,
            details,
            output: None,
            steps: Vec::new(),
        }
    }

    pub fn succeeded(stage: Stage) -> Self {
        Self::with_status(stage, StageStatus::Succeeded, Vec::new())
    }

    pub fn warning(stage: Stage, details: Vec<String>) -> Self {
        Self::with_status(stage, StageStatus::Warning, details)
    }

    pub fn failed(stage: Stage, details: Vec<String>) -> Self {
        Self::with_status(stage, StageStatus::Failed, details)
    }

    pub fn skipped(stage: Stage) -> Self {
        Self::with_status(stage, StageStatus::Skipped, Vec::new())
    }

    /// Pick succeeded / warning / failed from collected problems.
    pub fn from_problems(stage: Stage, failures: Vec<String>, warnings: Vec<String>) -> Self {
        if !failures.is_empty() {
            let mut details = failures;
            details.extend(warnings);
            Self::failed(stage, details)
        } else if !warnings.is_empty() {
            Self::warning(stage, warnings)
        } else {
            Self::succeeded(stage)
        }
    }

    /// Attach captured tool output.
    pub fn with_output(mut self, output: Option<String>) -> Self {
        self.output = output;
        self
    }

    /// Attach build step outcomes.
    pub fn with_steps(mut self, steps: Vec<StepOutcome>) -> Self {
        self.steps = steps;
        self
    }
}

/// Everything a pipeline run did.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisioningReport {
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<EnvironmentSnapshot>,
    pub stages: Vec<StageOutcome>,
}

impl Default for ProvisioningReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ProvisioningReport {
    /// Start an empty report now.
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            environment: None,
            stages: Vec::new(),
        }
    }

    pub fn push(&mut self, outcome: StageOutcome) {
        self.stages.push(outcome);
    }

    /// Stamp the finish time.
    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Outcome of `stage`, if it was recorded.
    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.stages.iter().find(|o| o.stage == stage)
    }

    pub fn status_of(&self, stage: Stage) -> Option<StageStatus> {
        self.outcome(stage).map(|o| o.status)
    }

    /// Stages that failed, in order.
    pub fn failed_stages(&self) -> Vec<Stage> {
        self.stages
            .iter()
            .filter(|o| o.status == StageStatus::Failed)
            .map(|o| o.stage)
            .collect()
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_stages().is_empty()
    }

    /// Process exit code for this report.
    pub fn exit_code(&self, strict: bool) -> u8 {
        if strict && self.has_failures() {
            EXIT_STAGE_FAILED
        } else {
            0
        }
    }

    /// Pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Print one line per stage.
    pub fn print_summary(&self, ui: &mut dyn UserInterface) {
        ui.show_header("Summary");
        for outcome in &self.stages {
            let line = match outcome.details.first() {
                Some(detail) => format!("{}: {} ({})", outcome.stage, outcome.status, detail),
                None => format!("{}: {}", outcome.stage, outcome.status),
            };
            match outcome.status {
                StageStatus::Succeeded => ui.success(&line),
                StageStatus::Warning => ui.warning(&line),
                StageStatus::Failed => ui.error(&line),
                StageStatus::Skipped => ui.message(&line),
            }
        }
        if let Some(finished) = self.finished_at {
            let elapsed = finished.signed_duration_since(self.started_at);
            ui.message(&format!("Finished in {:.1}s", elapsed.num_milliseconds() as f64 / 1000.0));
        }
    }
}
