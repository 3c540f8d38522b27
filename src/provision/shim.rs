//! Crypto-library compatibility shim.
//!
//! Newer toolchain releases no longer ship the crypto libraries their
//! network module loads at runtime on older hosts. A gzip tarball of those
//! libraries sits in the source tree and is unpacked into the installed
//! runtime toolchain package.

use anyhow::Context;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::path::Path;

use crate::environment::version_at_least;
use crate::error::Result;

/// Whether a toolchain version needs the shim.
pub fn shim_required(toolchain_version: &str, minimum: &str) -> bool {
    version_at_least(toolchain_version, minimum)
}

/// Unpack `archive` into `dest`, creating `dest` first.
///
/// Returns the number of archive entries written.
pub fn unpack_shim(archive: &Path, dest: &Path) -> Result<usize> {
    fs::create_dir_all(dest)
        .with_context(|| format!("Failed to create {}", dest.display()))?;

    let file = File::open(archive)
        .with_context(|| format!("Failed to open {}", archive.display()))?;
    let mut tarball = tar::Archive::new(GzDecoder::new(file));

    let mut count = 0;
    let entries = tarball
        .entries()
        .with_context(|| format!("Failed to read {}", archive.display()))?;
    for entry in entries {
        let mut entry = entry.with_context(|| format!("Corrupt entry in {}", archive.display()))?;
        entry
            .unpack_in(dest)
            .with_context(|| format!("Failed to unpack {}", archive.display()))?;
        count += 1;
    }

    tracing::debug!("unpacked {} entries into {}", count, dest.display());
    Ok(count)
}
