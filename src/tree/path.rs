//! Path canonicalization and containment checks

use std::path::{Path, PathBuf};

/// Canonicalize a path for comparison (resolves symlinks, `..`, `.`)
///
/// Uses `dunce` so Windows paths do not pick up the `\\?\` prefix.
pub fn canonicalize_path(path: &Path) -> std::io::Result<PathBuf> {
    dunce::canonicalize(path)
}

/// Canonicalize a path whose final component may not exist yet
///
/// The parent directory must exist; the file name is appended unchanged.
pub fn canonicalize_with_missing_leaf(path: &Path) -> std::io::Result<PathBuf> {
    if path.exists() {
        return canonicalize_path(path);
    }
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let canonical_parent = canonicalize_path(parent)?;
    Ok(match path.file_name() {
        Some(name) => canonical_parent.join(name),
        None => canonical_parent,
    })
}

/// Whether `inner` equals `outer` or lies beneath it
///
/// Both paths must already be canonical.
pub fn is_within(inner: &Path, outer: &Path) -> bool {
    inner.starts_with(outer)
}
