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

use crate::error::Result;
use crate::paths::shared::ensure_child_directory;
use std::path::{Path, PathBuf};

pub const DISTRIBUTION_PREFIX: &str = "dist-";
pub const STAGING_DIR: &str = ".tmp";

/// Final location of an extracted distribution: `<cache_root>/dist-<version>`.
pub fn distribution_dir(cache_root: &Path, version: &str) -> PathBuf {
    cache_root.join(format!("{DISTRIBUTION_PREFIX}{version}"))
}

/// Parent of the private staging directories used while extracting.
pub fn staging_root(cache_root: &Path) -> PathBuf {
    cache_root.join(STAGING_DIR)
}

pub fn ensure_staging_root(cache_root: &Path) -> Result<PathBuf> {
    ensure_child_directory(cache_root, STAGING_DIR)
}
