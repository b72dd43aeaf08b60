//! Downloads and boots a real Keycloak release. Needs network access and a
//! JDK, so it only runs with `--features integration_tests`.

mod common;

use common::TestHomeGuard;
use keycloak_local::config::KeycloakLocalConfig;
use keycloak_local::distribution::MARKER_FILES;
use keycloak_local::fixture::KeycloakFixture;
use keycloak_local::process::{LogSink, ProcessState};
use std::process::ExitStatus;
use std::sync::Arc;

const VERSION: &str = "26.0.7";

/// The JVM either dies from SIGTERM or runs its shutdown hooks and exits
/// with 0 or 128 + SIGTERM.
fn stopped_by_termination_request(status: &ExitStatus) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if status.signal() == Some(15) {
            return true;
        }
    }
    matches!(status.code(), Some(0) | Some(143))
}

#[test]
#[cfg_attr(not(feature = "integration_tests"), ignore)]
fn test_fixture_starts_real_keycloak() {
    let guard = TestHomeGuard::new();
    let mut config = KeycloakLocalConfig::with_home(guard.keycloak_home());
    config.download.no_progress = true;
    config.readiness.max_attempts = 120;

    let fixture = KeycloakFixture::new(VERSION, config).with_sink(Arc::new(LogSink));
    let instance = fixture.start().unwrap();

    for marker in MARKER_FILES {
        assert!(
            instance.distribution().root().join(marker).is_file(),
            "missing {marker}"
        );
    }
    assert!(instance.attempts() >= 1);
    assert_eq!(instance.process().state(), ProcessState::Running);
    assert!(!instance.process().is_empty());
    assert!(instance.process().contains("Keycloak"));

    let status = instance.close().unwrap().expect("server had been started");
    assert!(
        stopped_by_termination_request(&status),
        "unexpected exit: {status}"
    );
    assert_eq!(instance.process().state(), ProcessState::Terminated);

    // A second fixture reuses the cached distribution.
    let cached = KeycloakFixture::new(VERSION, KeycloakLocalConfig::with_home(guard.keycloak_home()))
        .acquire()
        .unwrap();
    assert_eq!(cached.root(), instance.distribution().root());
}
