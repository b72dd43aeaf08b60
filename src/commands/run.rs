use crate::config::KeycloakLocalConfig;
use crate::error::Result;
use crate::fixture::KeycloakFixture;
use crate::process::{ConsoleSink, LogSink, OutputSink};
use crate::shutdown;
use log::info;
use std::sync::Arc;
use std::time::Duration;

const HOLD_POLL: Duration = Duration::from_millis(200);

pub struct RunCommand<'a> {
    config: &'a KeycloakLocalConfig,
}

impl<'a> RunCommand<'a> {
    pub fn new(config: &'a KeycloakLocalConfig) -> Result<Self> {
        Ok(Self { config })
    }

    /// Start the server and keep it up until Ctrl-C or SIGTERM.
    pub fn execute(&self, version: &str, log_output: bool) -> Result<()> {
        let sink: Arc<dyn OutputSink> = if log_output {
            Arc::new(LogSink)
        } else {
            Arc::new(ConsoleSink)
        };
        let cancel = shutdown::global_token();

        let fixture = KeycloakFixture::new(version, self.config.clone())
            .with_sink(sink)
            .with_cancellation(cancel.clone());
        let instance = fixture.start()?;

        info!(
            "Keycloak {version} is ready at {} (press Ctrl-C to stop)",
            instance.url()
        );

        while !cancel.is_cancelled() && instance.process().exit_status().is_none() {
            cancel.sleep(HOLD_POLL);
        }

        instance.close()?;
        instance.process().check_drain()
    }
}
