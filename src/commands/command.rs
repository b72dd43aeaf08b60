use crate::config::KeycloakLocalConfig;
use crate::distribution::is_complete;
use crate::error::{KeycloakError, Result};
use crate::launch::{JavaRuntime, LaunchMode, LaunchSpec};
use crate::paths::{cache, shared};
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct CommandOutput<'a> {
    version: &'a str,
    mode: LaunchMode,
    executable: &'a str,
    arguments: &'a [String],
    working_directory: &'a Path,
}

/// Prints the launch command for a cached distribution.
pub struct ShowCommand<'a> {
    config: &'a KeycloakLocalConfig,
}

impl<'a> ShowCommand<'a> {
    pub fn new(config: &'a KeycloakLocalConfig) -> Result<Self> {
        Ok(Self { config })
    }

    pub fn execute(&self, version: &str, mode: LaunchMode, json: bool) -> Result<()> {
        let spec = self.spec(version, mode)?;

        if json {
            let output = CommandOutput {
                version,
                mode,
                executable: &spec.executable,
                arguments: &spec.arguments,
                working_directory: &spec.working_directory,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!("{}", spec.command_line());
        }
        Ok(())
    }

    fn spec(&self, version: &str, mode: LaunchMode) -> Result<LaunchSpec> {
        if !shared::is_safe_segment(version) {
            return Err(KeycloakError::ValidationError(format!(
                "'{version}' is not a valid release version"
            )));
        }

        let root = cache::distribution_dir(&self.config.cache_root(), version);
        if !is_complete(&root) {
            log::warn!(
                "Keycloak {version} is not in the cache yet; run `keycloak-local fetch {version}`"
            );
        }

        let java = JavaRuntime::resolve(self.config.java_home.as_deref());
        Ok(LaunchSpec::build_with_java(&root, mode, &java))
    }
}
