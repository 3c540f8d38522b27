//! Scripted command runner for testing.
//!
//! `MockRunner` implements [`CommandRunner`] without spawning anything. Each
//! invocation is recorded, and its result is looked up from rules keyed by
//! command-line prefix (the longest matching prefix wins). Unmatched
//! invocations succeed with empty output.
//!
//! # Example
//!
//! ```
//! use bindup::shell::{CommandRunner, Invocation, MockResponse, MockRunner};
//!
//! let runner = MockRunner::new();
//! runner.on("python3 -m pip show", MockResponse::fail(1, "not found"));
//!
//! let result = runner
//!     .run(&Invocation::new("python3").args(["-m", "pip", "show", "PySide6"]))
//!     .unwrap();
//! assert!(!result.success);
//! assert_eq!(runner.commands(), vec!["python3 -m pip show PySide6"]);
//! ```

use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

use crate::error::{BindupError, Result};

use super::command::{CommandResult, CommandRunner, Invocation};

/// A scripted outcome for a matched invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockResponse {
    /// The program ran and exited with `code`.
    Exit {
        code: i32,
        stdout: String,
        stderr: String,
    },
    /// The program could not be started.
    SpawnError,
}

impl MockResponse {
    /// Exit 0 with the given stdout.
    pub fn ok(stdout: &str) -> Self {
        Self::Exit {
            code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    /// Exit with a non-zero code and the given stderr.
    pub fn fail(code: i32, stderr: &str) -> Self {
        Self::Exit {
            code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

#[derive(Debug)]
struct Rule {
    prefix: String,
    queued: VecDeque<MockResponse>,
    fallback: MockResponse,
}

/// Command runner that replays scripted responses.
#[derive(Debug, Default)]
pub struct MockRunner {
    rules: RefCell<Vec<Rule>>,
    invocations: RefCell<Vec<Invocation>>,
}

impl MockRunner {
    /// Create a runner where every command succeeds silently.
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to every command starting with `prefix` with `response`.
    pub fn on(&self, prefix: &str, response: MockResponse) {
        self.on_sequence(prefix, vec![response]);
    }

    /// Respond with `responses` in order; the last one repeats afterwards.
    pub fn on_sequence(&self, prefix: &str, responses: Vec<MockResponse>) {
        let mut queued: VecDeque<MockResponse> = responses.into();
        let fallback = queued.pop_back().unwrap_or_else(|| MockResponse::ok(""));

        let mut rules = self.rules.borrow_mut();
        rules.retain(|r| r.prefix != prefix);
        rules.push(Rule {
            prefix: prefix.to_string(),
            queued,
            fallback,
        });
    }

    /// All recorded invocations, in call order.
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.borrow().clone()
    }

    /// All recorded command lines, in call order.
    pub fn commands(&self) -> Vec<String> {
        self.invocations
            .borrow()
            .iter()
            .map(Invocation::display)
            .collect()
    }

    /// Number of recorded command lines starting with `prefix`.
    pub fn count(&self, prefix: &str) -> usize {
        self.commands()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn respond(&self, line: &str) -> MockResponse {
        let mut rules = self.rules.borrow_mut();
        let best = rules
            .iter_mut()
            .filter(|r| line.starts_with(&r.prefix))
            .max_by_key(|r| r.prefix.len());

        match best {
            Some(rule) => rule
                .queued
                .pop_front()
                .unwrap_or_else(|| rule.fallback.clone()),
            None => MockResponse::ok(""),
        }
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        let line = invocation.display();
        self.invocations.borrow_mut().push(invocation.clone());

        match self.respond(&line) {
            MockResponse::Exit {
                code: 0,
                stdout,
                stderr,
            } => Ok(CommandResult::success(stdout, stderr, Duration::ZERO)),
            MockResponse::Exit {
                code,
                stdout,
                stderr,
            } => Ok(CommandResult::failure(
                Some(code),
                stdout,
                stderr,
                Duration::ZERO,
            )),
            MockResponse::SpawnError => Err(BindupError::CommandSpawn {
                command: line,
                message: "mock spawn failure".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(runner: &MockRunner, line: &[&str]) -> Result<CommandResult> {
        runner.run(&Invocation::new(line[0]).args(line[1..].iter().copied()))
    }

    #[test]
    fn unmatched_commands_succeed() {
        let runner = MockRunner::new();
        let result = run(&runner, &["cmake", "--version"]).unwrap();
        assert!(result.success);
        assert_eq!(runner.count("cmake"), 1);
    }

    #[test]
    fn longest_prefix_wins() {
        let runner = MockRunner::new();
        runner.on("python3", MockResponse::fail(1, "generic"));
        runner.on("python3 -m pip show", MockResponse::ok("Version: 6.6.2"));

        assert!(run(&runner, &["python3", "-m", "pip", "show", "x"])
            .unwrap()
            .success);
        assert!(!run(&runner, &["python3", "-c", "import x"]).unwrap().success);
    }

    #[test]
    fn sequence_replays_then_repeats_last() {
        let runner = MockRunner::new();
        runner.on_sequence(
            "pip",
            vec![MockResponse::fail(1, ""), MockResponse::ok("second")],
        );

        assert!(!run(&runner, &["pip"]).unwrap().success);
        assert_eq!(run(&runner, &["pip"]).unwrap().stdout, "second");
        assert_eq!(run(&runner, &["pip"]).unwrap().stdout, "second");
    }

    #[test]
    fn spawn_error_is_err() {
        let runner = MockRunner::new();
        runner.on("aqt", MockResponse::SpawnError);
        assert!(matches!(
            run(&runner, &["aqt", "install-qt"]),
            Err(BindupError::CommandSpawn { .. })
        ));
    }

    #[test]
    fn on_replaces_existing_rule() {
        let runner = MockRunner::new();
        runner.on("cmake", MockResponse::fail(2, ""));
        runner.on("cmake", MockResponse::ok(""));
        assert!(run(&runner, &["cmake"]).unwrap().success);
    }
}
