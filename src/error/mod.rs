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

mod context;
mod exit_codes;
mod format;

pub use context::ErrorContext;
pub use exit_codes::get_exit_code;
pub use format::format_error_chain;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeycloakError {
    #[error("Failed to acquire Keycloak {version}")]
    Acquisition {
        version: String,
        #[source]
        source: Box<KeycloakError>,
    },

    #[error("Keycloak build failed ({status})")]
    BuildFailed {
        status: String,
        exit_code: Option<i32>,
    },

    #[error("Failed to launch '{program}'")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Keycloak at {url} did not become ready after {attempts} attempts")]
    ReadinessTimeout { url: String, attempts: u32 },

    #[error("Readiness probe for {url} was cancelled after {attempts} attempts")]
    ProbeCancelled { url: String, attempts: u32 },

    #[error("Output reader stopped unexpectedly: {0}")]
    DrainInterrupted(String),

    #[error("Process supervisor is not idle (state: {state})")]
    AlreadyStarted { state: String },

    #[error("Failed to terminate process {pid}: {message}")]
    Termination { pid: u32, message: String },

    #[error("Not a usable Keycloak distribution: {}", .path.display())]
    InvalidDistribution { path: PathBuf, missing: Vec<String> },

    #[error("Download returned HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Security error: {0}")]
    SecurityError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Http(#[from] attohttpc::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}

impl KeycloakError {
    /// Wrap a low-level failure as the acquisition error for `version`.
    pub fn acquisition(version: &str, source: KeycloakError) -> Self {
        match source {
            already @ KeycloakError::Acquisition { .. } => already,
            source => KeycloakError::Acquisition {
                version: version.to_string(),
                source: Box::new(source),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, KeycloakError>;
