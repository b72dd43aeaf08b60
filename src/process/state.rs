use std::fmt;

/// Lifecycle of a [`SupervisedProcess`](super::SupervisedProcess).
///
/// Transitions only move forward: `Idle` to `Building` or `Running`, and
/// from any state to `Terminated`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    Idle,
    Building,
    Running,
    Terminated,
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessState::Idle => "idle",
            ProcessState::Building => "building",
            ProcessState::Running => "running",
            ProcessState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}
