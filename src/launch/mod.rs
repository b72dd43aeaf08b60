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

//! Launch command construction.
//!
//! Reproduces what `bin/kc.sh` would execute so the JVM can be started and
//! supervised directly, without the wrapper script in between.

mod flags;
mod java;

pub use java::{DEFAULT_JAVA, JAVA_HOME_ENV, JavaRuntime};

use crate::distribution::{Distribution, RUNNER_JAR};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchMode {
    /// Run the build step and exit.
    Build,
    /// Start the server from an already built distribution.
    Run,
}

impl LaunchMode {
    /// The system property that selects this mode; always the first JVM argument.
    pub fn mode_property(self) -> &'static str {
        match self {
            LaunchMode::Build => "-Dkc.config.build-and-exit=true",
            LaunchMode::Run => "-Dkc.config.built=true",
        }
    }
}

impl fmt::Display for LaunchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LaunchMode::Build => write!(f, "build"),
            LaunchMode::Run => write!(f, "run"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchSpec {
    pub executable: String,
    pub arguments: Vec<String>,
    pub working_directory: PathBuf,
}

impl LaunchSpec {
    /// Command for the distribution rooted at `root`, using `java` from `PATH`.
    ///
    /// `root` should pass [`crate::distribution::require_utf8`]; other paths
    /// end up lossily converted in the JVM properties.
    pub fn build(root: &Path, mode: LaunchMode) -> Self {
        Self::build_with_java(root, mode, &JavaRuntime::default())
    }

    pub fn build_with_java(root: &Path, mode: LaunchMode, java: &JavaRuntime) -> Self {
        let mut arguments = Vec::with_capacity(flags::JVM_FLAGS.len() + 7);
        arguments.push(mode.mode_property().to_string());
        arguments.extend(flags::JVM_FLAGS.iter().map(|flag| flag.render(root)));
        arguments.push("-cp".to_string());
        arguments.push(root.join(RUNNER_JAR).display().to_string());
        arguments.push(flags::ENTRY_POINT.to_string());
        arguments.extend(flags::SERVER_ARGUMENTS.iter().map(|arg| arg.to_string()));

        Self {
            executable: java.executable().to_string(),
            arguments,
            working_directory: root.to_path_buf(),
        }
    }

    pub fn for_distribution(distribution: &Distribution, mode: LaunchMode, java: &JavaRuntime) -> Self {
        Self::build_with_java(distribution.root(), mode, java)
    }

    /// A `Command` with program, arguments and working directory applied.
    /// Stdio is left for the caller to configure.
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.executable);
        command
            .args(&self.arguments)
            .current_dir(&self.working_directory);
        command
    }

    /// Single-line rendering for logs and the CLI.
    pub fn command_line(&self) -> String {
        std::iter::once(self.executable.as_str())
            .chain(self.arguments.iter().map(String::as_str))
            .map(|part| {
                if part.contains(char::is_whitespace) {
                    format!("'{part}'")
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
