// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::error::{KeycloakError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Whether `value` can be used verbatim as a single directory name.
///
/// Only ASCII alphanumerics and `.`, `-`, `_`, `+` are accepted, which covers
/// every published release tag and rules out separators and `..`.
pub fn is_safe_segment(value: &str) -> bool {
    !value.is_empty()
        && value != "."
        && value != ".."
        && value
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '.' | '-' | '_' | '+'))
}

/// Ensure the provided path exists, returning it on success.
pub fn ensure_directory(path: PathBuf) -> Result<PathBuf> {
    fs::create_dir_all(&path).map_err(|error| {
        KeycloakError::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to create directory {}: {error}", path.display()),
        ))
    })?;
    Ok(path)
}

/// Join a single directory segment onto the root and ensure the resulting path exists.
pub fn ensure_child_directory(root: &Path, child: &str) -> Result<PathBuf> {
    ensure_directory(root.join(child))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn safe_segments_accept_release_tags() {
        assert!(is_safe_segment("26.0.7"));
        assert!(is_safe_segment("999.0.0-SNAPSHOT"));
        assert!(is_safe_segment("nightly"));
    }

    #[test]
    fn safe_segments_reject_traversal() {
        assert!(!is_safe_segment(""));
        assert!(!is_safe_segment(".."));
        assert!(!is_safe_segment("../26.0.7"));
        assert!(!is_safe_segment("26.0.7/x"));
        assert!(!is_safe_segment("26 0 7"));
    }

    #[test]
    fn ensure_child_directory_creates_full_path() {
        let temp_dir = TempDir::new().unwrap();
        let child = ensure_child_directory(temp_dir.path(), "cache").unwrap();
        assert_eq!(child, temp_dir.path().join("cache"));
        assert!(child.exists());
    }
}
