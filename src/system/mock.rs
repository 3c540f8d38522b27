//! In-memory [`SystemProvisioner`] for tests.

use std::cell::RefCell;
use std::time::Duration;

use crate::environment::DistroIdentity;
use crate::error::Result;
use crate::shell::CommandResult;
use crate::ui::UserInterface;

use super::SystemProvisioner;

/// Fake host with a fixed identity that records native installs.
#[derive(Debug, Default)]
pub struct MockSystem {
    identity: DistroIdentity,
    fail_installs: bool,
    installs: RefCell<Vec<Vec<String>>>,
}

impl MockSystem {
    /// A host identifying as `id` / `version`.
    pub fn new(id: &str, version: &str) -> Self {
        Self::with_identity(DistroIdentity::new(id, version))
    }

    /// A host with an arbitrary identity.
    pub fn with_identity(identity: DistroIdentity) -> Self {
        Self {
            identity,
            ..Default::default()
        }
    }

    /// Make every install exit non-zero.
    pub fn failing_installs(mut self) -> Self {
        self.fail_installs = true;
        self
    }

    /// Every batch passed to `install_native`, in call order.
    pub fn installs(&self) -> Vec<Vec<String>> {
        self.installs.borrow().clone()
    }
}

impl SystemProvisioner for MockSystem {
    fn distro_identity(&self) -> DistroIdentity {
        self.identity.clone()
    }

    fn install_native(
        &self,
        packages: &[String],
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult> {
        ui.show_command(&format!("apt-get install -y {}", packages.join(" ")));
        self.installs.borrow_mut().push(packages.to_vec());

        if self.fail_installs {
            Ok(CommandResult::failure(
                Some(100),
                String::new(),
                "mock install failure".to_string(),
                Duration::ZERO,
            ))
        } else {
            Ok(CommandResult::success(String::new(), String::new(), Duration::ZERO))
        }
    }
}
