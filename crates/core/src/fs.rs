//! Filesystem utilities

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use log::debug;

/// Resolve a path that must point at an existing regular file.
///
/// The dataset is never created by this service, so a missing file is a
/// startup error rather than something to paper over.
pub fn require_file(path: &str) -> anyhow::Result<PathBuf> {
    let path = Path::new(path);
    if !path.exists() {
        bail!("file does not exist: {}", path.display());
    }
    if !path.is_file() {
        bail!("not a regular file: {}", path.display());
    }

    let resolved = path
        .canonicalize()
        .with_context(|| format!("failed to resolve path: {}", path.display()))?;
    debug!("resolved {} to {}", path.display(), resolved.display());
    Ok(resolved)
}
