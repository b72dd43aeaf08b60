//! Process-wide shutdown coordination.
//!
//! Child processes must not outlive the program. Supervisors register a
//! cleanup callback here; the callbacks run when the program receives
//! SIGINT, SIGTERM or SIGHUP, and again on normal process exit.

mod cancellation;
mod hooks;

pub use cancellation::{CancellationToken, global_token};
pub use hooks::{HookId, ShutdownRegistry, deregister, register, run_hooks};
