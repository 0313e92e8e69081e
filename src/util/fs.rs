//! Filesystem utilities.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result};
use glob::glob;

/// Modification time of the artifact at `path`.
///
/// Returns `Ok(None)` when nothing exists there; any other stat failure is
/// passed through.
pub fn modified(path: impl AsRef<Path>) -> io::Result<Option<SystemTime>> {
    match std::fs::metadata(path.as_ref()) {
        Ok(meta) => meta.modified().map(Some),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Expand glob patterns into a set of filesystem entries.
fn file_set<S: AsRef<str>>(patterns: &[S]) -> Result<BTreeSet<String>> {
    let mut results = BTreeSet::new();

    for pattern in patterns {
        let pattern = pattern.as_ref();
        for entry in glob(pattern).with_context(|| format!("invalid glob pattern: {}", pattern))? {
            match entry {
                Ok(path) => {
                    results.insert(path.to_string_lossy().into_owned());
                }
                Err(e) => {
                    tracing::warn!("glob error: {}", e);
                }
            }
        }
    }

    Ok(results)
}

/// Entries matching any of `include` but none of `exclude`.
///
/// Patterns are resolved relative to the working directory, and matches are
/// returned as target identifiers ready to be used as sources. The result
/// carries no ordering guarantee callers should rely on.
pub fn files<I, E>(include: &[I], exclude: &[E]) -> Result<Vec<String>>
where
    I: AsRef<str>,
    E: AsRef<str>,
{
    let included = file_set(include)?;
    let excluded = file_set(exclude)?;
    Ok(included.difference(&excluded).cloned().collect())
}
