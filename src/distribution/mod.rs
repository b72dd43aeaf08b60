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

//! Versioned Keycloak distributions in the local cache.
//!
//! A distribution is usable once every entry of [`MARKER_FILES`] exists
//! beneath its root. Extraction is staged in a private directory and renamed
//! into place, so the markers only ever appear on a complete tree.

mod acquirer;
mod staging;

pub use acquirer::DistributionAcquirer;
pub use staging::{DistributionStager, FinalizeOutcome, StagingContext};

use crate::config::KeycloakLocalConfig;
use crate::error::{KeycloakError, Result};
use crate::paths::cache;
use std::path::{Path, PathBuf};

/// Files whose presence proves an extraction finished.
pub const MARKER_FILES: [&str; 4] = [
    "bin/kc.sh",
    "bin/kc.bat",
    "lib/quarkus-run.jar",
    "lib/app/keycloak.jar",
];

/// Classpath entry that boots the server.
pub const RUNNER_JAR: &str = "lib/quarkus-run.jar";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Distribution {
    version: String,
    root: PathBuf,
}

impl Distribution {
    /// Wrap an existing directory, failing if any marker is missing.
    pub fn open(version: impl Into<String>, root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        require_utf8(&root)?;
        let missing = missing_markers(&root);
        if !missing.is_empty() {
            return Err(KeycloakError::InvalidDistribution {
                path: root,
                missing,
            });
        }

        Ok(Self {
            version: version.into(),
            root,
        })
    }

    /// Return the cached distribution for `version` if it is complete.
    pub fn locate(cache_root: &Path, version: &str) -> Option<Self> {
        let root = cache::distribution_dir(cache_root, version);
        (root.to_str().is_some() && is_complete(&root)).then(|| Self {
            version: version.to_string(),
            root,
        })
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn runner_jar(&self) -> PathBuf {
        self.root.join(RUNNER_JAR)
    }
}

/// JVM properties carry the root as text, so it has to be valid UTF-8.
pub fn require_utf8(root: &Path) -> Result<()> {
    match root.to_str() {
        Some(_) => Ok(()),
        None => Err(KeycloakError::ValidationError(format!(
            "distribution path {} is not valid UTF-8",
            root.display()
        ))),
    }
}

/// Marker files absent beneath `root`, in table order.
pub fn missing_markers(root: &Path) -> Vec<String> {
    MARKER_FILES
        .iter()
        .filter(|marker| !root.join(marker).is_file())
        .map(|marker| marker.to_string())
        .collect()
}

pub fn is_complete(root: &Path) -> bool {
    root.is_dir() && missing_markers(root).is_empty()
}

/// Ensure `version` is extracted under `cache_root` using default download
/// settings.
pub fn acquire(version: &str, cache_root: &Path) -> Result<Distribution> {
    let mut config = KeycloakLocalConfig::with_home(cache_root);
    config.cache_root = Some(cache_root.to_path_buf());
    DistributionAcquirer::new(&config).acquire(version, cache_root)
}
