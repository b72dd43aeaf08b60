//! Supervision of the Keycloak JVM.
//!
//! [`SupervisedProcess`] runs the build step synchronously and the server in
//! the background, capturing the server's combined output line by line.

mod drain;
mod log;
mod sink;
mod state;
mod supervisor;

pub use self::log::ProcessLog;
pub use sink::{ConsoleSink, LOG_TARGET, LogSink, NullSink, OutputSink};
pub use state::ProcessState;
pub use supervisor::{DEFAULT_GRACE_PERIOD, SupervisedProcess};
