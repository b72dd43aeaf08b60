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
use crate::user_agent;
use attohttpc::{Response, Session};
use std::io::{self, Read};
use std::time::Duration;

/// Blocking HTTP GET, shared by the archive downloader and the readiness probe.
pub trait HttpClient: Send + Sync {
    fn get(&self, url: &str) -> Result<Box<dyn HttpResponse>>;

    /// Overall deadline per request. `None` removes it.
    fn set_timeout(&mut self, timeout: Option<Duration>);
}

pub trait HttpResponse: Read + Send {
    fn status(&self) -> u16;

    fn header(&self, name: &str) -> Option<&str>;
}

/// Limit for establishing a connection.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Limit for a single stalled read; a transfer that keeps making progress is
/// never cut off by it.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(60);

pub struct AttohttpcClient {
    timeout: Option<Duration>,
    user_agent: String,
}

impl AttohttpcClient {
    pub fn new() -> Self {
        Self::with_user_agent(user_agent::download_client())
    }

    pub fn with_user_agent(user_agent: String) -> Self {
        Self {
            timeout: None,
            user_agent,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn capped(&self, limit: Duration) -> Duration {
        self.timeout.map_or(limit, |timeout| timeout.min(limit))
    }
}

impl Default for AttohttpcClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient for AttohttpcClient {
    fn get(&self, url: &str) -> Result<Box<dyn HttpResponse>> {
        // Create a new session for each request
        let mut session = Session::new();
        session.proxy_settings(attohttpc::ProxySettings::from_env());

        let mut request = session
            .get(url)
            .connect_timeout(self.capped(DEFAULT_CONNECT_TIMEOUT))
            .read_timeout(self.capped(DEFAULT_READ_TIMEOUT))
            .header("User-Agent", &self.user_agent)
            .follow_redirects(true);
        if let Some(timeout) = self.timeout {
            request = request.timeout(timeout);
        }
        let response = request.send()?;

        Ok(Box::new(AttohttpcResponse { response }))
    }

    fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }
}

struct AttohttpcResponse {
    response: Response,
}

impl Read for AttohttpcResponse {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.response.read(buf)
    }
}

impl HttpResponse for AttohttpcResponse {
    fn status(&self) -> u16 {
        self.response.status().as_u16()
    }

    fn header(&self, name: &str) -> Option<&str> {
        self.response.headers().get(name)?.to_str().ok()
    }
}
