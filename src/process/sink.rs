use std::io::Write;

/// Receives each output line as the drain thread reads it.
pub trait OutputSink: Send + Sync {
    fn line(&self, line: &str);
}

/// Echoes output to this program's stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl OutputSink for ConsoleSink {
    fn line(&self, line: &str) {
        let mut stdout = std::io::stdout().lock();
        let _ = writeln!(stdout, "{line}");
    }
}

/// Routes output through `log` at info level under the `keycloak` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

pub const LOG_TARGET: &str = "keycloak";

impl OutputSink for LogSink {
    fn line(&self, line: &str) {
        log::info!(target: LOG_TARGET, "{line}");
    }
}

/// Discards output; the process log still records it.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn line(&self, _line: &str) {}
}
