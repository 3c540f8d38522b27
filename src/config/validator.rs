//! Semantic validation of a loaded configuration.

use crate::config::schema::BindupConfig;
use crate::environment::version::parse_version;
use crate::error::{BindupError, Result};

/// Validate a configuration, returning the first problem found.
pub fn validate(config: &BindupConfig) -> Result<()> {
    let required = [
        ("runtime.interpreter", &config.runtime.interpreter),
        ("runtime.toolchain_package", &config.runtime.toolchain_package),
        ("runtime.binding_package", &config.runtime.binding_package),
        ("build.tool", &config.build.tool),
        ("library_path_var", &config.library_path_var),
        ("toolchain.dir_name", &config.toolchain.dir_name),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(invalid(format!("'{}' must not be empty", field)));
        }
    }

    if parse_version(&config.toolchain.crypto_shim_min_version).is_none() {
        return Err(invalid(format!(
            "'toolchain.crypto_shim_min_version' is not a dotted version: {}",
            config.toolchain.crypto_shim_min_version
        )));
    }

    if config.build.jobs == Some(0) {
        return Err(invalid("'build.jobs' must be at least 1".to_string()));
    }

    Ok(())
}

fn invalid(message: String) -> BindupError {
    BindupError::ConfigValidationError { message }
}
