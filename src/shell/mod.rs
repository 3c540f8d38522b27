//! External command execution and privilege handling.

pub mod command;
pub mod mock;
pub mod platform;

pub use command::{execute, run_announced, CommandResult, CommandRunner, Invocation, SystemRunner};
pub use mock::{MockResponse, MockRunner};
pub use platform::{is_elevated, privileged_with, ELEVATION_PROGRAM};
