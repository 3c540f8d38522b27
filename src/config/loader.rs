//! Configuration file discovery and loading.
//!
//! Layers are merged in this order (later overrides earlier):
//! 1. User global config (`~/.bindup/config.yml`)
//! 2. Project config (`<source>/.bindup.yml`)
//! 3. Explicit `--config <path>`

use crate::config::merger::merge_configs;
use crate::config::schema::BindupConfig;
use crate::config::validator::validate;
use crate::error::{BindupError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Project config file name, looked up in the source directory.
pub const PROJECT_CONFIG_FILE: &str = ".bindup.yml";

/// Paths to configuration files in merge order.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// User's global config: ~/.bindup/config.yml
    pub user_global: Option<PathBuf>,

    /// Project config: <source>/.bindup.yml
    pub project: Option<PathBuf>,

    /// Explicit override passed on the command line
    pub explicit: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given source directory.
    pub fn discover(source_dir: &Path, explicit: Option<&Path>) -> Self {
        Self::discover_with_home(source_dir, explicit, dirs::home_dir().as_deref())
    }

    /// Discover config files with an explicit home directory.
    pub fn discover_with_home(
        source_dir: &Path,
        explicit: Option<&Path>,
        home: Option<&Path>,
    ) -> Self {
        let user_global = home
            .map(|h| h.join(".bindup").join("config.yml"))
            .filter(|p| p.is_file());
        let project = Some(source_dir.join(PROJECT_CONFIG_FILE)).filter(|p| p.is_file());

        Self {
            user_global,
            project,
            explicit: explicit.map(Path::to_path_buf),
        }
    }

    /// Returns all config paths in merge order.
    pub fn all(&self) -> Vec<&PathBuf> {
        [&self.user_global, &self.project, &self.explicit]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Load a config file as raw YAML (for merging).
///
/// An empty file counts as an empty mapping.
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BindupError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            BindupError::Io(e)
        }
    })?;

    if content.trim().is_empty() {
        return Ok(serde_yaml::Value::Mapping(Default::default()));
    }

    serde_yaml::from_str(&content).map_err(|e| BindupError::ConfigParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load, merge and validate configuration for a source directory.
///
/// With no config files at all, the built-in defaults are returned.
///
/// # Errors
///
/// Returns `ConfigNotFound` if an explicit path does not exist.
/// Returns `ConfigParseError` if any config file is invalid.
pub fn load_config(source_dir: &Path, explicit: Option<&Path>) -> Result<BindupConfig> {
    load_from_paths(&ConfigPaths::discover(source_dir, explicit))
}

/// Load, merge and validate the given config layers.
pub fn load_from_paths(paths: &ConfigPaths) -> Result<BindupConfig> {
    let mut layers = Vec::new();
    for path in paths.all() {
        tracing::debug!("loading config layer {}", path.display());
        layers.push(load_config_value(path)?);
    }

    let merged = merge_configs(&layers);
    let report_path = paths
        .all()
        .last()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(PROJECT_CONFIG_FILE));

    let config: BindupConfig =
        serde_yaml::from_value(merged).map_err(|e| BindupError::ConfigParseError {
            path: report_path,
            message: e.to_string(),
        })?;

    validate(&config)?;
    Ok(config)
}
