use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Append-only, ordered record of a process's combined output.
#[derive(Debug, Default)]
pub struct ProcessLog {
    lines: Mutex<Vec<String>>,
    appended: Condvar,
}

impl ProcessLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, line: String) {
        self.guard().push(line);
        self.appended.notify_all();
    }

    /// Snapshot of every line captured so far.
    pub fn lines(&self) -> Vec<String> {
        self.guard().clone()
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether any captured line contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.guard().iter().any(|line| line.contains(needle))
    }

    /// Block until a line containing `needle` is captured or `timeout` passes.
    pub fn wait_for(&self, needle: &str, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut lines = self.guard();
        let mut scanned = 0;

        loop {
            if lines[scanned..].iter().any(|line| line.contains(needle)) {
                return true;
            }
            scanned = lines.len();

            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            lines = match self.appended.wait_timeout(lines, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }

    fn guard(&self) -> MutexGuard<'_, Vec<String>> {
        self.lines.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
