//! Locating the `java` executable that runs the server.

use crate::platform::file_ops;
use log::{debug, warn};
use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const DEFAULT_JAVA: &str = "java";

pub const JAVA_HOME_ENV: &str = "JAVA_HOME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaRuntime {
    executable: String,
}

impl Default for JavaRuntime {
    fn default() -> Self {
        Self {
            executable: DEFAULT_JAVA.to_string(),
        }
    }
}

impl JavaRuntime {
    pub fn from_executable(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Pick the JVM: the configured `java_home`, then `JAVA_HOME`, then
    /// `java` on `PATH`. Falls back to the bare `java` name so the launch
    /// error names the program that could not be found.
    pub fn resolve(configured_home: Option<&Path>) -> Self {
        Self::resolve_with(configured_home, env::var_os(JAVA_HOME_ENV))
    }

    pub(crate) fn resolve_with(configured_home: Option<&Path>, env_home: Option<OsString>) -> Self {
        if let Some(home) = configured_home {
            let java = java_binary(home);
            if !java.is_file() {
                warn!("Configured java_home has no {}", java.display());
            }
            return Self::from_path(&java);
        }

        if let Some(home) = env_home.filter(|value| !value.is_empty()) {
            let java = java_binary(Path::new(&home));
            if file_ops::is_executable(&java).unwrap_or(false) {
                debug!("Using java from {JAVA_HOME_ENV}: {}", java.display());
                return Self::from_path(&java);
            }
            debug!("{JAVA_HOME_ENV} has no {}, searching PATH", java.display());
        }

        match which::which(DEFAULT_JAVA) {
            Ok(java) => {
                debug!("Using java from PATH: {}", java.display());
                Self::from_path(&java)
            }
            Err(_) => Self::default(),
        }
    }

    fn from_path(path: &Path) -> Self {
        Self::from_executable(path.to_string_lossy().into_owned())
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }
}

fn java_binary(home: &Path) -> PathBuf {
    let name = if cfg!(windows) { "java.exe" } else { "java" };
    home.join("bin").join(name)
}
