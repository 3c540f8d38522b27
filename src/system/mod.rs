//! Host operating-system capabilities.
//!
//! Pipeline code reaches the OS package manager and the distribution
//! identity only through [`SystemProvisioner`], so it can be exercised with
//! [`MockSystem`] instead of a real host.

pub mod apt;
pub mod mock;

pub use apt::AptSystem;
pub use mock::MockSystem;

use crate::environment::DistroIdentity;
use crate::error::Result;
use crate::shell::CommandResult;
use crate::ui::UserInterface;

/// Narrow interface to the host's package manager and identity.
pub trait SystemProvisioner {
    /// Identify the running distribution.
    fn distro_identity(&self) -> DistroIdentity;

    /// Install native packages in a single batch.
    ///
    /// A non-zero exit is returned as an unsuccessful [`CommandResult`].
    fn install_native(
        &self,
        packages: &[String],
        ui: &mut dyn UserInterface,
    ) -> Result<CommandResult>;
}
