//! External command execution.
//!
//! Every external tool bindup drives (package managers, the toolchain
//! fetcher, the native build system, the interpreter) is described by an
//! [`Invocation`] and executed through a [`CommandRunner`]. Production code
//! uses [`SystemRunner`]; tests substitute [`MockRunner`](super::MockRunner).

use crate::error::{BindupError, Result};
use crate::ui::UserInterface;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// Result of executing an external command.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Execution duration.
    pub duration: Duration,

    /// Whether command succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    /// Create a success result.
    pub fn success(stdout: String, stderr: String, duration: Duration) -> Self {
        Self {
            exit_code: Some(0),
            stdout,
            stderr,
            duration,
            success: true,
        }
    }

    /// Create a failure result.
    pub fn failure(
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
        duration: Duration,
    ) -> Self {
        Self {
            exit_code,
            stdout,
            stderr,
            duration,
            success: false,
        }
    }

    /// Combined stdout and stderr, for printing after a failure.
    pub fn combined_output(&self) -> String {
        match (self.stdout.trim().is_empty(), self.stderr.trim().is_empty()) {
            (true, true) => String::new(),
            (false, true) => self.stdout.clone(),
            (true, false) => self.stderr.clone(),
            (false, false) => format!("{}\n{}", self.stdout.trim_end(), self.stderr),
        }
    }
}

/// A single external program invocation.
///
/// Arguments are passed as argv entries, never through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program to run (looked up on PATH).
    pub program: String,

    /// Arguments.
    pub args: Vec<String>,

    /// Environment overlay, applied on top of the inherited environment.
    pub env: BTreeMap<String, String>,

    /// Working directory.
    pub cwd: Option<PathBuf>,
}

impl Invocation {
    /// Create an invocation of `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            cwd: None,
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set one environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// Merge an environment overlay into the child's environment.
    pub fn envs(mut self, overlay: &BTreeMap<String, String>) -> Self {
        for (key, value) in overlay {
            self.env.insert(key.clone(), value.clone());
        }
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// The full command line, for display.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Something that can run external commands.
///
/// Runners return `Ok` whenever the program started, whatever its exit code.
/// `Err` is reserved for programs that could not be spawned.
pub trait CommandRunner {
    /// Run the invocation to completion.
    fn run(&self, invocation: &Invocation) -> Result<CommandResult>;
}

/// Runs invocations as real child processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        execute(invocation)
    }
}

/// Execute an invocation, blocking until it exits.
pub fn execute(invocation: &Invocation) -> Result<CommandResult> {
    let start = Instant::now();
    tracing::debug!("spawning: {}", invocation.display());

    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args);

    if let Some(cwd) = &invocation.cwd {
        cmd.current_dir(cwd);
    }

    for (key, value) in &invocation.env {
        cmd.env(key, value);
    }

    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd.output().map_err(|e| BindupError::CommandSpawn {
        command: invocation.display(),
        message: e.to_string(),
    })?;

    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    if output.status.success() {
        Ok(CommandResult::success(stdout, stderr, duration))
    } else {
        tracing::debug!(
            "'{}' exited with {:?}",
            invocation.display(),
            output.status.code()
        );
        Ok(CommandResult::failure(
            output.status.code(),
            stdout,
            stderr,
            duration,
        ))
    }
}

/// Announce an invocation, run it, and surface captured output on failure.
///
/// Verbose mode shows the output of successful runs too.
pub fn run_announced(
    runner: &dyn CommandRunner,
    ui: &mut dyn UserInterface,
    invocation: &Invocation,
) -> Result<CommandResult> {
    ui.show_command(&invocation.display());
    let result = runner.run(invocation)?;
    if !result.success || ui.output_mode().shows_command_output() {
        ui.command_output(&result.combined_output());
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execute_successful_command() {
        let inv = Invocation::new("sh").args(["-c", "echo hello"]);
        let result = execute(&inv).unwrap();

        assert!(result.success);
        assert_eq!(result.exit_code, Some(0));
        assert!(result.stdout.contains("hello"));
    }

    #[test]
    fn execute_failing_command() {
        let inv = Invocation::new("sh").args(["-c", "exit 3"]);
        let result = execute(&inv).unwrap();

        assert!(!result.success);
        assert_eq!(result.exit_code, Some(3));
    }

    #[test]
    fn execute_missing_program_is_spawn_error() {
        let inv = Invocation::new("definitely-not-a-real-program-bindup");
        let err = execute(&inv).unwrap_err();
        assert!(matches!(err, BindupError::CommandSpawn { .. }));
    }

    #[test]
    fn execute_with_env_overlay() {
        let inv = Invocation::new("sh")
            .args(["-c", "echo $MY_VAR"])
            .env("MY_VAR", "my_value");
        let result = execute(&inv).unwrap();

        assert!(result.success);
        assert!(result.stdout.contains("my_value"));
    }

    #[test]
    fn execute_with_cwd() {
        let temp = tempfile::TempDir::new().unwrap();
        let inv = Invocation::new("pwd").cwd(temp.path());
        let result = execute(&inv).unwrap();

        assert!(result.success);
        let name = temp.path().file_name().unwrap().to_string_lossy();
        assert!(result.stdout.contains(name.as_ref()));
    }

    #[test]
    fn system_runner_delegates_to_execute() {
        let result = SystemRunner
            .run(&Invocation::new("sh").args(["-c", "echo runner"]))
            .unwrap();
        assert!(result.stdout.contains("runner"));
    }

    #[test]
    fn run_announced_shows_command_and_failure_output() {
        let runner = crate::shell::MockRunner::new();
        runner.on(
            "cmake --build",
            crate::shell::MockResponse::fail(2, "undefined reference"),
        );
        let mut ui = crate::ui::MockUI::new();

        let inv = Invocation::new("cmake").args(["--build", "build"]);
        let result = run_announced(&runner, &mut ui, &inv).unwrap();

        assert!(!result.success);
        assert_eq!(ui.commands(), ["cmake --build build"]);
        assert!(ui.outputs().iter().any(|o| o.contains("undefined reference")));
    }

    #[test]
    fn run_announced_hides_success_output_unless_verbose() {
        let runner = crate::shell::MockRunner::new();
        runner.on("cmake", crate::shell::MockResponse::ok("-- Configuring done"));
        let inv = Invocation::new("cmake").args(["-S", "."]);

        let mut normal = crate::ui::MockUI::new();
        run_announced(&runner, &mut normal, &inv).unwrap();
        assert!(normal.outputs().is_empty());

        let mut verbose = crate::ui::MockUI::with_mode(crate::ui::OutputMode::Verbose);
        run_announced(&runner, &mut verbose, &inv).unwrap();
        assert_eq!(verbose.outputs().len(), 1);
    }

    #[test]
    fn run_announced_keeps_quiet_on_success() {
        let runner = crate::shell::MockRunner::new();
        let mut ui = crate::ui::MockUI::new();
        run_announced(&runner, &mut ui, &Invocation::new("true")).unwrap();
        assert!(ui.outputs().is_empty());
    }

    #[test]
    fn display_joins_program_and_args() {
        let inv = Invocation::new("cmake").args(["--build", "build", "-j3"]);
        assert_eq!(inv.display(), "cmake --build build -j3");
    }

    #[test]
    fn envs_merges_overlay() {
        let mut overlay = BTreeMap::new();
        overlay.insert("A".to_string(), "1".to_string());
        let inv = Invocation::new("true").env("B", "2").envs(&overlay);
        assert_eq!(inv.env.len(), 2);
    }

    #[test]
    fn combined_output_prefers_non_empty_streams() {
        let only_err = CommandResult::failure(
            Some(1),
            String::new(),
            "boom\n".to_string(),
            Duration::ZERO,
        );
        assert_eq!(only_err.combined_output(), "boom\n");

        let both = CommandResult::failure(
            Some(1),
            "out\n".to_string(),
            "err\n".to_string(),
            Duration::ZERO,
        );
        assert_eq!(both.combined_output(), "out\nerr\n");
    }
}
