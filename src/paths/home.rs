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
use std::env;
use std::path::{Path, PathBuf};

pub const HOME_ENV: &str = "KEYCLOAK_LOCAL_HOME";
pub const DEFAULT_HOME_DIR: &str = ".keycloak-local";
pub const CACHE_DIR: &str = "cache";
pub const CONFIG_FILE: &str = "config.toml";

/// Resolve the home directory from `KEYCLOAK_LOCAL_HOME`, falling back to
/// `~/.keycloak-local`.
pub fn resolve_home() -> Result<PathBuf> {
    if let Ok(value) = env::var(HOME_ENV)
        && !value.trim().is_empty()
    {
        let path = PathBuf::from(value);
        if path.is_absolute() {
            return Ok(path);
        }
        return Ok(env::current_dir()?.join(path));
    }

    dirs::home_dir()
        .map(|home| home.join(DEFAULT_HOME_DIR))
        .ok_or_else(|| {
            KeycloakError::ConfigError(format!(
                "Unable to determine the home directory; set {HOME_ENV}"
            ))
        })
}

pub fn cache_dir(home: &Path) -> PathBuf {
    home.join(CACHE_DIR)
}

pub fn config_file(home: &Path) -> PathBuf {
    home.join(CONFIG_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn directory_helpers_join_expected_paths() {
        let home = Path::new("/tmp/keycloak-local");
        assert_eq!(cache_dir(home), PathBuf::from("/tmp/keycloak-local/cache"));
        assert_eq!(
            config_file(home),
            PathBuf::from("/tmp/keycloak-local/config.toml")
        );
    }

    #[test]
    #[serial]
    fn resolve_home_prefers_environment() {
        let temp = TempDir::new().unwrap();
        unsafe {
            env::set_var(HOME_ENV, temp.path());
        }

        let resolved = resolve_home().unwrap();

        unsafe {
            env::remove_var(HOME_ENV);
        }
        assert_eq!(resolved, temp.path());
    }

    #[test]
    #[serial]
    fn resolve_home_defaults_to_user_home() {
        unsafe {
            env::remove_var(HOME_ENV);
        }

        if let Some(user_home) = dirs::home_dir() {
            assert_eq!(resolve_home().unwrap(), user_home.join(DEFAULT_HOME_DIR));
        }
    }
}
