//! Platform-specific file operations.

use std::fs;
use std::path::Path;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Check if a file is executable
#[cfg(unix)]
pub fn is_executable(path: &Path) -> std::io::Result<bool> {
    let metadata = fs::metadata(path)?;
    Ok(metadata.permissions().mode() & 0o111 != 0)
}

#[cfg(windows)]
pub fn is_executable(path: &Path) -> std::io::Result<bool> {
    Ok(fs::metadata(path)?.is_file())
}

/// Set file permissions from a Unix mode value stored in an archive entry.
///
/// Only the permission bits are applied; file type bits in `mode` are
/// ignored. Directories always keep owner `rwx` so extraction can continue
/// beneath them.
#[cfg(unix)]
pub fn set_permissions_from_mode(path: &Path, mode: u32) -> std::io::Result<()> {
    let mut permissions = mode & 0o7777;
    if path.is_dir() {
        permissions |= 0o700;
    }
    fs::set_permissions(path, fs::Permissions::from_mode(permissions))
}

/// Set file permissions from a Unix mode value (Windows - no-op)
#[cfg(windows)]
pub fn set_permissions_from_mode(_path: &Path, _mode: u32) -> std::io::Result<()> {
    // Windows doesn't use Unix-style permissions
    Ok(())
}

/// Move a fully written directory into its final place.
///
/// Fails with `AlreadyExists` (or `DirectoryNotEmpty` on some systems) when
/// another writer got there first; callers decide whether that is a loss.
pub fn rename_directory(from: &Path, to: &Path) -> std::io::Result<()> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::rename(from, to)
}
