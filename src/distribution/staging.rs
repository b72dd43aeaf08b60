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

use crate::distribution::{is_complete, missing_markers};
use crate::error::{KeycloakError, Result};
use crate::paths::cache;
use crate::platform::file_ops;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct StagingContext {
    pub final_path: PathBuf,
    pub temp_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeOutcome {
    /// This stager's tree was renamed into place.
    Installed,
    /// A concurrent acquirer finished first; the staged copy was discarded.
    AlreadyPresent,
}

pub struct DistributionStager;

impl DistributionStager {
    pub fn prepare(cache_root: &Path, final_path: &Path) -> Result<StagingContext> {
        let temp_parent = cache::ensure_staging_root(cache_root)?;

        let temp_name = format!("install-{}", uuid::Uuid::new_v4());
        let temp_path = temp_parent.join(temp_name);
        fs::create_dir(&temp_path)?;

        Ok(StagingContext {
            final_path: final_path.to_path_buf(),
            temp_path,
        })
    }

    /// Move the extracted tree into `final_path`.
    ///
    /// The archive's single top-level directory becomes the distribution
    /// root. The staging directory is removed whatever the outcome.
    pub fn finalize(context: StagingContext) -> Result<FinalizeOutcome> {
        let result = Self::move_into_place(&context);
        if context.temp_path.exists() {
            let _ = fs::remove_dir_all(&context.temp_path);
        }
        result
    }

    fn move_into_place(context: &StagingContext) -> Result<FinalizeOutcome> {
        let source_path = Self::staged_root(&context.temp_path)?;

        let missing = missing_markers(&source_path);
        if !missing.is_empty() {
            return Err(KeycloakError::InvalidDistribution {
                path: source_path,
                missing,
            });
        }

        match file_ops::rename_directory(&source_path, &context.final_path) {
            Ok(()) => Ok(FinalizeOutcome::Installed),
            Err(_) if is_complete(&context.final_path) => {
                log::debug!(
                    "{} was completed concurrently, discarding staged copy",
                    context.final_path.display()
                );
                Ok(FinalizeOutcome::AlreadyPresent)
            }
            Err(e) if context.final_path.exists() => {
                log::debug!("Rename into {} failed: {e}", context.final_path.display());
                Err(KeycloakError::InvalidDistribution {
                    path: context.final_path.clone(),
                    missing: missing_markers(&context.final_path),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// The directory holding the distribution inside the staging area.
    fn staged_root(temp_path: &Path) -> Result<PathBuf> {
        let entries: Vec<_> = fs::read_dir(temp_path)?
            .filter_map(|entry| entry.ok())
            .collect();

        if entries.len() == 1 && entries[0].file_type()?.is_dir() {
            Ok(entries[0].path())
        } else {
            Ok(temp_path.to_path_buf())
        }
    }

    pub fn cleanup_failed(context: &StagingContext) -> Result<()> {
        if context.temp_path.exists() {
            fs::remove_dir_all(&context.temp_path)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::fixtures::create_fake_distribution;
    use tempfile::TempDir;

    fn staged(temp: &TempDir, version: &str) -> StagingContext {
        let final_path = cache::distribution_dir(temp.path(), version);
        DistributionStager::prepare(temp.path(), &final_path).unwrap()
    }

    #[test]
    fn prepare_creates_private_directory_under_staging_root() {
        let temp = TempDir::new().unwrap();

        let first = staged(&temp, "26.0.7");
        let second = staged(&temp, "26.0.7");

        assert!(first.temp_path.is_dir());
        assert!(first.temp_path.starts_with(cache::staging_root(temp.path())));
        assert_ne!(first.temp_path, second.temp_path);
        assert!(!first.final_path.exists());
    }

    #[test]
    fn finalize_strips_single_top_level_directory() {
        let temp = TempDir::new().unwrap();
        let context = staged(&temp, "26.0.7");
        let staging = context.temp_path.clone();
        create_fake_distribution(&staging.join("keycloak-26.0.7"));

        let outcome = DistributionStager::finalize(context).unwrap();

        let final_path = cache::distribution_dir(temp.path(), "26.0.7");
        assert_eq!(outcome, FinalizeOutcome::Installed);
        assert!(final_path.join("bin/kc.sh").is_file());
        assert!(!final_path.join("keycloak-26.0.7").exists());
        assert!(!staging.exists());
    }

    #[test]
    fn finalize_rejects_tree_without_markers() {
        let temp = TempDir::new().unwrap();
        let context = staged(&temp, "26.0.7");
        let staging = context.temp_path.clone();
        fs::create_dir_all(staging.join("keycloak-26.0.7/bin")).unwrap();

        let result = DistributionStager::finalize(context);

        assert!(matches!(
            result,
            Err(KeycloakError::InvalidDistribution { .. })
        ));
        assert!(!staging.exists());
        assert!(!cache::distribution_dir(temp.path(), "26.0.7").exists());
    }

    #[test]
    fn finalize_loses_race_gracefully() {
        let temp = TempDir::new().unwrap();
        let winner = cache::distribution_dir(temp.path(), "26.0.7");
        create_fake_distribution(&winner);
        fs::write(winner.join("winner.txt"), "first").unwrap();

        let context = staged(&temp, "26.0.7");
        let staging = context.temp_path.clone();
        create_fake_distribution(&staging.join("keycloak-26.0.7"));

        let outcome = DistributionStager::finalize(context).unwrap();

        assert_eq!(outcome, FinalizeOutcome::AlreadyPresent);
        assert!(winner.join("winner.txt").exists());
        assert!(!staging.exists());
    }

    #[test]
    fn finalize_refuses_incomplete_destination() {
        let temp = TempDir::new().unwrap();
        let destination = cache::distribution_dir(temp.path(), "26.0.7");
        fs::create_dir_all(destination.join("bin")).unwrap();
        fs::write(destination.join("bin/kc.sh"), "partial").unwrap();

        let context = staged(&temp, "26.0.7");
        create_fake_distribution(&context.temp_path.join("keycloak-26.0.7"));

        let result = DistributionStager::finalize(context);

        match result {
            Err(KeycloakError::InvalidDistribution { path, .. }) => assert_eq!(path, destination),
            other => panic!("unexpected result: {other:?}"),
        }
        assert_eq!(
            fs::read_to_string(destination.join("bin/kc.sh")).unwrap(),
            "partial"
        );
    }

    #[test]
    fn cleanup_failed_removes_staging() {
        let temp = TempDir::new().unwrap();
        let context = staged(&temp, "26.0.7");
        fs::write(context.temp_path.join("partial.jar"), "x").unwrap();

        DistributionStager::cleanup_failed(&context).unwrap();

        assert!(!context.temp_path.exists());
    }
}
