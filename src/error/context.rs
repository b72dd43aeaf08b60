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

use crate::error::KeycloakError;
use std::fmt;

pub struct ErrorContext<'a> {
    pub error: &'a KeycloakError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl<'a> ErrorContext<'a> {
    pub fn new(error: &'a KeycloakError) -> Self {
        let (suggestion, details) = match error {
            KeycloakError::Acquisition { version, source } => {
                let suggestion = match source.as_ref() {
                    KeycloakError::HttpStatus { status: 404, .. } => Some(format!(
                        "Check that Keycloak {version} exists on the release page, or point \
                         KEYCLOAK_LOCAL_DOWNLOAD__BASE_URL at a mirror that hosts it."
                    )),
                    KeycloakError::Io(_) => Some(
                        "Ensure the cache directory is writable and has enough free space."
                            .to_string(),
                    ),
                    _ => Some(
                        "Check your internet connection and proxy settings, then try again."
                            .to_string(),
                    ),
                };
                (suggestion, None)
            }
            KeycloakError::BuildFailed { exit_code, .. } => {
                let suggestion = Some(
                    "Inspect the build output above. A broken cache entry can be removed and \
                     downloaded again."
                        .to_string(),
                );
                let details =
                    exit_code.map(|code| format!("The build step exited with code {code}."));
                (suggestion, details)
            }
            KeycloakError::Launch { program, source } => {
                let suggestion = if source.kind() == std::io::ErrorKind::NotFound {
                    Some(format!(
                        "'{program}' was not found. Install a JDK (17 or newer) or set JAVA_HOME."
                    ))
                } else {
                    Some(format!("Check that '{program}' is executable."))
                };
                let details = Some(format!("Launch failed: {source}"));
                (suggestion, details)
            }
            KeycloakError::ReadinessTimeout { url, attempts } => {
                let suggestion = Some(
                    "Check the captured server log for startup errors, or raise \
                     KEYCLOAK_LOCAL_READINESS__MAX_ATTEMPTS."
                        .to_string(),
                );
                let details = Some(format!("Polled {url} {attempts} times without HTTP 200."));
                (suggestion, details)
            }
            KeycloakError::AlreadyStarted { .. } => {
                let suggestion = Some(
                    "Create a new SupervisedProcess for every launch; a closed one cannot be \
                     reused."
                        .to_string(),
                );
                (suggestion, None)
            }
            KeycloakError::InvalidDistribution { missing, .. } => {
                let suggestion = Some(
                    "Remove the directory so the distribution is downloaded again.".to_string(),
                );
                let details = if missing.is_empty() {
                    None
                } else {
                    Some(format!(
                        "Missing files:\n{}",
                        missing
                            .iter()
                            .map(|p| format!("  - {p}"))
                            .collect::<Vec<_>>()
                            .join("\n")
                    ))
                };
                (suggestion, details)
            }
            KeycloakError::ChecksumMismatch { .. } => {
                let suggestion = Some(
                    "Try downloading again. If the problem persists, the file may be corrupted at \
                     the source."
                        .to_string(),
                );
                let details = Some(
                    "The downloaded archive's checksum doesn't match the published value."
                        .to_string(),
                );
                (suggestion, details)
            }
            KeycloakError::NetworkError(msg) => {
                let suggestion = Some(
                    "Check your internet connection and proxy settings (HTTP_PROXY, HTTPS_PROXY)."
                        .to_string(),
                );
                let details = Some(format!("Network failure: {msg}"));
                (suggestion, details)
            }
            KeycloakError::ConfigError(msg) => {
                let suggestion = Some(
                    "Check config.toml in KEYCLOAK_LOCAL_HOME and KEYCLOAK_LOCAL_* environment \
                     variables."
                        .to_string(),
                );
                let details = Some(msg.clone());
                (suggestion, details)
            }
            _ => (None, None),
        };

        ErrorContext {
            error,
            suggestion,
            details,
        }
    }

    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    pub fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }
}

impl<'a> fmt::Display for ErrorContext<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\n\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\n\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}
