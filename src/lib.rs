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

//! Download, launch and supervise a local Keycloak server for integration tests.
//!
//! [`KeycloakFixture`] is the usual entry point: it acquires a cached
//! distribution, runs the build step, starts the server and waits until it
//! answers HTTP 200.

pub mod archive;
pub mod commands;
pub mod config;
pub mod distribution;
pub mod download;
pub mod error;
pub mod fixture;
pub mod launch;
pub mod logging;
pub mod paths;
pub mod platform;
pub mod process;
pub mod readiness;
pub mod shutdown;
pub mod user_agent;

pub use distribution::{Distribution, acquire};
pub use error::{KeycloakError, Result};
pub use fixture::{KeycloakFixture, KeycloakInstance};
pub use launch::{LaunchMode, LaunchSpec};
pub use process::SupervisedProcess;
pub use readiness::{ReadinessProbe, wait_until_ready};
