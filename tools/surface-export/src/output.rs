//! Artifact writing
//!
//! Files are written to a temporary sibling and renamed into place, so a
//! build step never observes a half-written source file and a failed
//! conversion leaves nothing behind.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::ConversionError;

/// Atomically replace `path` with `contents`, creating parent directories.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<(), ConversionError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(|e| ConversionError::io(dir, e))?;

    let mut file = NamedTempFile::new_in(dir).map_err(|e| ConversionError::io(dir, e))?;
    file.write_all(contents)
        .and_then(|_| file.flush())
        .and_then(|_| set_artifact_permissions(file.as_file()))
        .map_err(|e| ConversionError::io(path, e))?;
    file.persist(path)
        .map_err(|e| ConversionError::io(path, e.error))?;

    tracing::debug!("Wrote {} bytes to {:?}", contents.len(), path);
    Ok(())
}

/// Temporary files are created owner-only; artifacts are read by other build
/// users, so they get the usual `rw-r--r--`.
#[cfg(unix)]
fn set_artifact_permissions(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(ARTIFACT_MODE))
}

#[cfg(not(unix))]
fn set_artifact_permissions(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}

#[cfg(unix)]
const ARTIFACT_MODE: u32 = 0o644;
