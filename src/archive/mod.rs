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
use crate::platform::file_ops;
use std::fs::{self, File};
use std::path::{Component, Path, PathBuf};
use zip::ZipArchive;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveInfo {
    pub file_count: usize,
    pub uncompressed_size: u64,
}

/// Extract a distribution zip into `destination`, entry by entry.
///
/// Directories and files are handled separately, parent directories are
/// created on demand and relative paths are preserved. Unix permission bits
/// stored in the archive are restored.
pub fn extract_archive(archive_path: &Path, destination: &Path) -> Result<ArchiveInfo> {
    fs::create_dir_all(destination)?;

    let file = File::open(archive_path)?;
    let mut archive = ZipArchive::new(file)?;

    if archive.is_empty() {
        return Err(KeycloakError::ValidationError(format!(
            "Zip archive is empty: {}",
            archive_path.display()
        )));
    }

    let total_entries = archive.len();
    let mut file_count = 0;
    let mut uncompressed_size = 0u64;

    for i in 0..total_entries {
        let mut entry = archive.by_index(i)?;
        let raw_name = PathBuf::from(entry.name());
        validate_entry_path(&raw_name)?;

        let relative = match entry.enclosed_name() {
            Some(path) => path,
            None => {
                return Err(KeycloakError::SecurityError(format!(
                    "Archive entry would extract outside destination: {raw_name:?}"
                )));
            }
        };
        let outpath = destination.join(&relative);

        if entry.is_dir() {
            fs::create_dir_all(&outpath)?;
        } else {
            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent)?;
            }
            let mut outfile = File::create(&outpath)?;
            uncompressed_size += std::io::copy(&mut entry, &mut outfile)?;
            file_count += 1;
        }

        if let Some(mode) = entry.unix_mode() {
            file_ops::set_permissions_from_mode(&outpath, mode)?;
        }

        if (i + 1) % 500 == 0 {
            log::debug!("Extracted {}/{} entries...", i + 1, total_entries);
        }
    }

    log::debug!(
        "Extracted {file_count} files ({uncompressed_size} bytes) from {}",
        archive_path.display()
    );
    Ok(ArchiveInfo {
        file_count,
        uncompressed_size,
    })
}

fn validate_entry_path(entry_path: &Path) -> Result<()> {
    for component in entry_path.components() {
        match component {
            Component::ParentDir => {
                return Err(KeycloakError::SecurityError(format!(
                    "Archive contains path traversal: {entry_path:?}"
                )));
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(KeycloakError::SecurityError(format!(
                    "Archive contains absolute path: {entry_path:?}"
                )));
            }
            _ => {}
        }
    }

    Ok(())
}
