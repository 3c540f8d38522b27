//! Process environment overlay and parallelism for build stages.

use std::collections::BTreeMap;
use std::path::Path;

use crate::environment::ProcessEnv;

/// Separator of search-path variables.
const PATH_SEPARATOR: char = ':';

/// Overlay that adds `lib_dir` to the dynamic-library search path.
///
/// An existing non-empty value keeps its entries and gets `lib_dir`
/// appended; otherwise the variable is set to `lib_dir` alone.
pub fn library_path_overlay(
    env: &ProcessEnv,
    var: &str,
    lib_dir: &Path,
) -> BTreeMap<String, String> {
    let lib_dir = lib_dir.display().to_string();
    let value = match env.get(var).filter(|v| !v.is_empty()) {
        Some(existing) => format!("{}{}{}", existing, PATH_SEPARATOR, lib_dir),
        None => lib_dir,
    };

    let mut overlay = BTreeMap::new();
    overlay.insert(var.to_string(), value);
    overlay
}

/// Compile jobs for a host with `cores` cores: one core is left free.
pub fn jobs_for(cores: usize) -> usize {
    cores.saturating_sub(1).max(1)
}

/// Compile jobs for this host.
pub fn default_jobs() -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    jobs_for(cores)
}
