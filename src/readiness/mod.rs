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

//! Polling the server's HTTP endpoint until it answers 200.

use crate::config::ReadinessConfig;
use crate::download::{AttohttpcClient, HttpClient};
use crate::error::{KeycloakError, Result};
use crate::shutdown::{self, CancellationToken};
use crate::user_agent;
use log::{debug, info};
use std::time::Duration;

pub const DEFAULT_URL: &str = "http://localhost:8080/";
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessProbe {
    pub url: String,
    pub max_attempts: u32,
    pub interval: Duration,
    pub attempt_timeout: Duration,
}

impl Default for ReadinessProbe {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

impl ReadinessProbe {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval: DEFAULT_INTERVAL,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    pub fn from_config(config: &ReadinessConfig) -> Self {
        Self {
            url: config.url.clone(),
            max_attempts: config.max_attempts,
            interval: config.interval(),
            attempt_timeout: config.attempt_timeout(),
        }
    }

    /// HTTP client whose per-request timeout is the attempt timeout.
    pub fn http_client(&self) -> AttohttpcClient {
        let mut client = AttohttpcClient::with_user_agent(user_agent::readiness_client());
        client.set_timeout(Some(self.attempt_timeout));
        client
    }

    /// Poll over HTTP until the endpoint returns 200.
    pub fn wait(&self, cancel: &CancellationToken) -> Result<u32> {
        self.wait_until_ready(&self.http_client(), cancel)
    }

    /// Issue up to `max_attempts` GET requests, sleeping `interval` after
    /// each one that does not return 200.
    ///
    /// Returns the number of attempts used. Connection errors, timeouts and
    /// other statuses only mean "not ready yet".
    pub fn wait_until_ready(&self, client: &dyn HttpClient, cancel: &CancellationToken) -> Result<u32> {
        for attempt in 1..=self.max_attempts {
            if cancel.is_cancelled() {
                return Err(self.cancelled(attempt - 1));
            }

            match client.get(&self.url) {
                Ok(response) if response.status() == 200 => {
                    info!("Connected to {} after {attempt} attempts", self.url);
                    return Ok(attempt);
                }
                Ok(response) => {
                    debug!(
                        "Attempt {attempt}/{}: {} returned HTTP {}",
                        self.max_attempts,
                        self.url,
                        response.status()
                    );
                }
                Err(e) => {
                    debug!(
                        "Attempt {attempt}/{}: {} not reachable: {e}",
                        self.max_attempts, self.url
                    );
                }
            }

            if !cancel.sleep(self.interval) {
                return Err(self.cancelled(attempt));
            }
        }

        Err(KeycloakError::ReadinessTimeout {
            url: self.url.clone(),
            attempts: self.max_attempts,
        })
    }

    fn cancelled(&self, attempts: u32) -> KeycloakError {
        KeycloakError::ProbeCancelled {
            url: self.url.clone(),
            attempts,
        }
    }
}

/// Poll `url` with explicit limits, cancelled by SIGINT or SIGTERM.
pub fn wait_until_ready(
    url: &str,
    max_attempts: u32,
    interval: Duration,
    attempt_timeout: Duration,
) -> Result<u32> {
    let probe = ReadinessProbe {
        url: url.to_string(),
        max_attempts,
        interval,
        attempt_timeout,
    };
    probe.wait(&shutdown::global_token())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::download::HttpResponse;
    use std::io::{self, Read};
    use std::sync::Mutex;
    use std::time::Instant;

    /// Answers from a script; `None` entries simulate connection failures.
    struct ScriptedClient {
        script: Mutex<Vec<Option<u16>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedClient {
        fn new(mut script: Vec<Option<u16>>) -> Self {
            script.reverse();
            Self {
                script: Mutex::new(script),
                calls: Mutex::new(0),
            }
        }

        fn calls(&self) -> u32 {
            *self.calls.lock().unwrap()
        }
    }

    struct StatusOnly(u16);

    impl Read for StatusOnly {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Ok(0)
        }
    }

    impl HttpResponse for StatusOnly {
        fn status(&self) -> u16 {
            self.0
        }

        fn header(&self, _name: &str) -> Option<&str> {
            None
        }
    }

    impl HttpClient for ScriptedClient {
        fn get(&self, _url: &str) -> Result<Box<dyn HttpResponse>> {
            *self.calls.lock().unwrap() += 1;
            match self.script.lock().unwrap().pop().flatten() {
                Some(status) => Ok(Box::new(StatusOnly(status))),
                None => Err(KeycloakError::NetworkError("connection refused".to_string())),
            }
        }

        fn set_timeout(&mut self, _timeout: Option<Duration>) {}
    }

    fn fast_probe(max_attempts: u32) -> ReadinessProbe {
        ReadinessProbe {
            max_attempts,
            interval: Duration::from_millis(20),
            ..ReadinessProbe::default()
        }
    }

    #[test]
    fn defaults_match_documented_values() {
        let probe = ReadinessProbe::default();

        assert_eq!(probe.url, "http://localhost:8080/");
        assert_eq!(probe.max_attempts, 30);
        assert_eq!(probe.interval, Duration::from_secs(1));
        assert_eq!(probe.attempt_timeout, Duration::from_secs(2));
    }

    #[test]
    fn from_config_copies_values() {
        let config = ReadinessConfig {
            url: "http://127.0.0.1:9090/health".to_string(),
            max_attempts: 4,
            interval_ms: 250,
            attempt_timeout_ms: 500,
        };

        let probe = ReadinessProbe::from_config(&config);

        assert_eq!(probe.url, "http://127.0.0.1:9090/health");
        assert_eq!(probe.max_attempts, 4);
        assert_eq!(probe.interval, Duration::from_millis(250));
        assert_eq!(probe.attempt_timeout, Duration::from_millis(500));
    }

    #[test]
    fn succeeds_on_first_200() {
        let client = ScriptedClient::new(vec![Some(200)]);

        let attempts = fast_probe(5)
            .wait_until_ready(&client, &CancellationToken::new())
            .unwrap();

        assert_eq!(attempts, 1);
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn succeeds_after_k_attempts() {
        let client = ScriptedClient::new(vec![None, Some(503), Some(302), Some(200)]);

        let attempts = fast_probe(10)
            .wait_until_ready(&client, &CancellationToken::new())
            .unwrap();

        assert_eq!(attempts, 4);
        assert_eq!(client.calls(), 4);
    }

    #[test]
    fn exhausts_exactly_max_attempts() {
        let client = ScriptedClient::new(vec![None; 5]);
        let probe = fast_probe(5);

        let started = Instant::now();
        let err = probe
            .wait_until_ready(&client, &CancellationToken::new())
            .unwrap_err();

        assert_eq!(client.calls(), 5);
        assert!(started.elapsed() >= probe.interval * 5);
        match err {
            KeycloakError::ReadinessTimeout { url, attempts } => {
                assert_eq!(url, DEFAULT_URL);
                assert_eq!(attempts, 5);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn cancellation_is_not_a_timeout() {
        let client = ScriptedClient::new(vec![None; 30]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = fast_probe(30).wait_until_ready(&client, &cancel).unwrap_err();

        assert!(matches!(
            err,
            KeycloakError::ProbeCancelled { attempts: 0, .. }
        ));
        assert_eq!(client.calls(), 0);
    }

    #[test]
    fn cancellation_during_sleep_stops_probe() {
        let client = ScriptedClient::new(vec![None; 30]);
        let cancel = CancellationToken::new();
        let probe = ReadinessProbe {
            interval: Duration::from_secs(30),
            ..fast_probe(30)
        };
        let canceller = cancel.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(100));
            canceller.cancel();
        });

        let started = Instant::now();
        let err = probe.wait_until_ready(&client, &cancel).unwrap_err();
        handle.join().unwrap();

        assert!(matches!(
            err,
            KeycloakError::ProbeCancelled { attempts: 1, .. }
        ));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
