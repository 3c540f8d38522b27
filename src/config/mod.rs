//! Configuration loading, parsing, and validation for bindup.
//!
//! - Schema definitions in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Layer merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use bindup::config::{load_config, MirrorStrategy};
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join(".bindup.yml"), "mirror:\n  strategy: always\n").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! assert_eq!(config.mirror.strategy, MirrorStrategy::Always);
//! ```

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use loader::{load_config, load_config_value, load_from_paths, ConfigPaths, PROJECT_CONFIG_FILE};
pub use merger::{deep_merge, merge_configs};
pub use schema::{
    BindupConfig, BuildSettings, FailurePolicy, MirrorSettings, MirrorStrategy, PolicySettings,
    RuntimeSettings, SymlinkSettings, ToolchainSettings,
};
pub use validator::validate;
