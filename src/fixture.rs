//! One-call provisioning of a ready Keycloak server.

use crate::config::KeycloakLocalConfig;
use crate::distribution::{Distribution, DistributionAcquirer};
use crate::error::Result;
use crate::launch::{JavaRuntime, LaunchMode, LaunchSpec};
use crate::process::{ConsoleSink, OutputSink, SupervisedProcess};
use crate::readiness::ReadinessProbe;
use crate::shutdown::{self, CancellationToken};
use log::warn;
use std::process::ExitStatus;
use std::sync::Arc;

/// Drives acquire, build, start and readiness for one Keycloak version.
pub struct KeycloakFixture {
    version: String,
    config: KeycloakLocalConfig,
    sink: Arc<dyn OutputSink>,
    cancel: Option<CancellationToken>,
}

impl KeycloakFixture {
    pub fn new(version: impl Into<String>, config: KeycloakLocalConfig) -> Self {
        Self {
            version: version.into(),
            config,
            sink: Arc::new(ConsoleSink),
            cancel: None,
        }
    }

    pub fn with_sink(mut self, sink: Arc<dyn OutputSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Observe `cancel` while probing instead of the signal-driven global token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = Some(cancel);
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Make sure the distribution is in the cache.
    pub fn acquire(&self) -> Result<Distribution> {
        DistributionAcquirer::new(&self.config).acquire(&self.version, &self.config.cache_root())
    }

    /// Acquire, build and start the server, then wait until it answers.
    pub fn start(&self) -> Result<KeycloakInstance> {
        let distribution = self.acquire()?;
        self.start_distribution(distribution)
    }

    /// Build and start an already materialised distribution.
    ///
    /// The server is stopped again if it never becomes ready.
    pub fn start_distribution(&self, distribution: Distribution) -> Result<KeycloakInstance> {
        let java = JavaRuntime::resolve(self.config.java_home.as_deref());
        let grace_period = self.config.shutdown.grace_period();

        let builder = SupervisedProcess::with_options(self.sink.clone(), grace_period);
        builder.build(&LaunchSpec::for_distribution(
            &distribution,
            LaunchMode::Build,
            &java,
        ))?;

        let process = SupervisedProcess::with_options(self.sink.clone(), grace_period);
        process.start(&LaunchSpec::for_distribution(
            &distribution,
            LaunchMode::Run,
            &java,
        ))?;

        let cancel = self
            .cancel
            .clone()
            .unwrap_or_else(shutdown::global_token);
        let probe = ReadinessProbe::from_config(&self.config.readiness);
        match probe.wait(&cancel) {
            Ok(attempts) => Ok(KeycloakInstance {
                distribution,
                process,
                url: probe.url,
                attempts,
            }),
            Err(e) => {
                if let Err(close_error) = process.close() {
                    warn!("Failed to stop Keycloak after readiness failure: {close_error}");
                }
                Err(e)
            }
        }
    }
}

/// A running, reachable server. Dropping it stops the process.
pub struct KeycloakInstance {
    distribution: Distribution,
    process: SupervisedProcess,
    url: String,
    attempts: u32,
}

impl KeycloakInstance {
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    pub fn process(&self) -> &SupervisedProcess {
        &self.process
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Number of readiness attempts it took to get a 200.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn close(&self) -> Result<Option<ExitStatus>> {
        self.process.close()
    }
}
