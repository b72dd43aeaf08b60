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

use crate::error::{KeycloakError, Result};
use crate::launch::LaunchSpec;
use crate::platform::process::{describe_exit_status, request_termination};
use crate::process::drain::{DrainShared, spawn_drain};
use crate::process::log::ProcessLog;
use crate::process::sink::{ConsoleSink, OutputSink};
use crate::process::state::ProcessState;
use crate::shutdown::{self, HookId};
use log::{debug, info, warn};
use std::process::{Child, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(30);

struct Inner {
    state: ProcessState,
    child: Option<Child>,
    pid: Option<u32>,
    drain: Option<JoinHandle<()>>,
    exit_status: Option<ExitStatus>,
    /// A close has taken the child and is waiting for it outside the lock.
    stopping: bool,
}

struct Shared {
    inner: Mutex<Inner>,
    close_lock: Mutex<()>,
    log: Arc<ProcessLog>,
    closing: Arc<AtomicBool>,
    drain_failure: Arc<Mutex<Option<String>>>,
    grace_period: Duration,
}

/// Owns at most one child process for its whole life.
///
/// A supervisor is single-use: it moves from `Idle` to `Building` or
/// `Running` and ends in `Terminated`. The child is terminated by
/// [`close`](Self::close), by `Drop`, or by the process-wide shutdown hooks
/// when the program is interrupted or exits.
pub struct SupervisedProcess {
    shared: Arc<Shared>,
    sink: Arc<dyn OutputSink>,
    hook: Mutex<Option<HookId>>,
}

impl Default for SupervisedProcess {
    fn default() -> Self {
        Self::new()
    }
}

impl SupervisedProcess {
    /// Supervisor that echoes output to stdout and waits up to 30s on close.
    pub fn new() -> Self {
        Self::with_options(Arc::new(ConsoleSink), DEFAULT_GRACE_PERIOD)
    }

    pub fn with_options(sink: Arc<dyn OutputSink>, grace_period: Duration) -> Self {
        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner {
                state: ProcessState::Idle,
                child: None,
                pid: None,
                drain: None,
                exit_status: None,
                stopping: false,
            }),
            close_lock: Mutex::new(()),
            log: Arc::new(ProcessLog::new()),
            closing: Arc::new(AtomicBool::new(false)),
            drain_failure: Arc::new(Mutex::new(None)),
            grace_period,
        });

        let weak: Weak<Shared> = Arc::downgrade(&shared);
        let hook = shutdown::register(move || {
            if let Some(shared) = weak.upgrade()
                && let Err(e) = shared.close()
            {
                warn!("Failed to stop Keycloak during shutdown: {e}");
            }
        });

        Self {
            shared,
            sink,
            hook: Mutex::new(Some(hook)),
        }
    }

    /// Run `spec` to completion with inherited stdio.
    ///
    /// Fails with [`KeycloakError::BuildFailed`] when the process exits
    /// unsuccessfully, including when it was stopped by `close`.
    pub fn build(&self, spec: &LaunchSpec) -> Result<()> {
        let pid = {
            let mut inner = self.shared.lock();
            ensure_idle(&inner)?;

            info!("Building Keycloak in {}", spec.working_directory.display());
            debug!("Build command: {}", spec.command_line());

            let mut command = spec.to_command();
            command
                .stdin(Stdio::null())
                .stdout(Stdio::inherit())
                .stderr(Stdio::inherit());

            let child = match command.spawn() {
                Ok(child) => child,
                Err(source) => {
                    inner.state = ProcessState::Terminated;
                    return Err(KeycloakError::Launch {
                        program: spec.executable.clone(),
                        source,
                    });
                }
            };

            let pid = child.id();
            inner.pid = Some(pid);
            inner.child = Some(child);
            inner.state = ProcessState::Building;
            pid
        };

        let result = self.wait_for_build(pid);
        self.release_hook();

        let status = result?;
        if status.success() {
            info!("Keycloak build finished");
            Ok(())
        } else {
            let status_text = describe_exit_status(&status);
            warn!("Keycloak build failed with {status_text}");
            Err(KeycloakError::BuildFailed {
                status: status_text,
                exit_code: status.code(),
            })
        }
    }

    fn wait_for_build(&self, pid: u32) -> Result<ExitStatus> {
        loop {
            {
                let mut inner = self.shared.lock();
                if let Some(status) = inner.exit_status {
                    return Ok(status);
                }

                if inner.child.is_none() && inner.stopping {
                    drop(inner);
                    thread::sleep(POLL_INTERVAL);
                    continue;
                }

                let Some(child) = inner.child.as_mut() else {
                    return Err(KeycloakError::Termination {
                        pid,
                        message: "build process was released without an exit status".to_string(),
                    });
                };

                match child.try_wait() {
                    Ok(Some(status)) => {
                        inner.child = None;
                        inner.pid = None;
                        inner.exit_status = Some(status);
                        inner.state = ProcessState::Terminated;
                        return Ok(status);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        inner.child = None;
                        inner.pid = None;
                        inner.state = ProcessState::Terminated;
                        return Err(KeycloakError::Termination {
                            pid,
                            message: e.to_string(),
                        });
                    }
                }
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    /// Launch `spec` in the background with stdout and stderr merged.
    ///
    /// A dedicated thread drains the combined output into the process log
    /// and the configured sink until EOF.
    pub fn start(&self, spec: &LaunchSpec) -> Result<()> {
        let mut inner = self.shared.lock();
        ensure_idle(&inner)?;

        debug!("Run command: {}", spec.command_line());

        let (reader, writer) = std::io::pipe()?;
        let writer_for_stderr = writer.try_clone()?;

        let mut command = spec.to_command();
        command
            .stdin(Stdio::null())
            .stdout(writer)
            .stderr(writer_for_stderr);
        let spawned = command.spawn();
        // The command holds our copies of the write end; EOF needs them gone.
        drop(command);

        let mut child = match spawned {
            Ok(child) => child,
            Err(source) => {
                inner.state = ProcessState::Terminated;
                return Err(KeycloakError::Launch {
                    program: spec.executable.clone(),
                    source,
                });
            }
        };
        let pid = child.id();

        let drain = spawn_drain(
            reader,
            DrainShared {
                log: self.shared.log.clone(),
                sink: self.sink.clone(),
                closing: self.shared.closing.clone(),
                failure: self.shared.drain_failure.clone(),
            },
        );
        let drain = match drain {
            Ok(handle) => handle,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                inner.state = ProcessState::Terminated;
                return Err(e.into());
            }
        };

        inner.child = Some(child);
        inner.pid = Some(pid);
        inner.drain = Some(drain);
        inner.state = ProcessState::Running;
        info!("Started Keycloak (pid {pid})");
        Ok(())
    }

    /// Terminate the child, wait for it and join the drain thread.
    ///
    /// Safe to call repeatedly and from several threads; later calls return
    /// the exit status recorded by the first. Returns `None` if nothing was
    /// ever launched.
    pub fn close(&self) -> Result<Option<ExitStatus>> {
        let result = self.shared.close();
        self.release_hook();
        result
    }

    fn release_hook(&self) {
        let id = self
            .hook
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        if let Some(id) = id {
            shutdown::deregister(id);
        }
    }

    pub fn state(&self) -> ProcessState {
        self.shared.lock().state
    }

    pub fn pid(&self) -> Option<u32> {
        self.shared.lock().pid
    }

    /// Exit status if the child has exited, without waiting.
    pub fn exit_status(&self) -> Option<ExitStatus> {
        let mut inner = self.shared.lock();
        if inner.exit_status.is_none()
            && let Some(child) = inner.child.as_mut()
            && let Ok(Some(status)) = child.try_wait()
        {
            return Some(status);
        }
        inner.exit_status
    }

    /// Shared handle to the captured output.
    pub fn log(&self) -> Arc<ProcessLog> {
        self.shared.log.clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.shared.log.lines()
    }

    pub fn len(&self) -> usize {
        self.shared.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.log.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.shared.log.contains(needle)
    }

    pub fn wait_for_line(&self, needle: &str, timeout: Duration) -> bool {
        self.shared.log.wait_for(needle, timeout)
    }

    /// Report an output read failure that happened outside of `close`.
    pub fn check_drain(&self) -> Result<()> {
        let failure = self
            .shared
            .drain_failure
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        match failure {
            Some(message) => Err(KeycloakError::DrainInterrupted(message)),
            None => Ok(()),
        }
    }
}

impl Drop for SupervisedProcess {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Failed to stop Keycloak: {e}");
        }
        self.release_hook();
    }
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn close(&self) -> Result<Option<ExitStatus>> {
        // Serialises closers; `inner` is only held long enough to take the handles.
        let _closing = self
            .close_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let (child, drain, pid) = {
            let mut inner = self.lock();
            match inner.state {
                ProcessState::Terminated => return Ok(inner.exit_status),
                ProcessState::Idle => {
                    inner.state = ProcessState::Terminated;
                    return Ok(None);
                }
                ProcessState::Building | ProcessState::Running => {}
            }

            self.closing.store(true, Ordering::SeqCst);
            inner.state = ProcessState::Terminated;
            inner.stopping = true;
            (
                inner.child.take(),
                inner.drain.take(),
                inner.pid.take().unwrap_or_default(),
            )
        };

        let result = match child {
            Some(mut child) => self.terminate(&mut child, pid),
            None => Err(KeycloakError::Termination {
                pid,
                message: "no process handle".to_string(),
            }),
        };

        if let Some(drain) = drain
            && drain.join().is_err()
        {
            warn!("Output reader thread panicked");
        }

        {
            let mut inner = self.lock();
            inner.stopping = false;
            if let Ok(status) = &result {
                inner.exit_status = Some(*status);
            }
        }

        let status = result?;
        info!(
            "Keycloak process {pid} exited with {}",
            describe_exit_status(&status)
        );
        Ok(Some(status))
    }

    fn terminate(&self, child: &mut Child, pid: u32) -> Result<ExitStatus> {
        let wait_error = |e: std::io::Error| KeycloakError::Termination {
            pid,
            message: e.to_string(),
        };

        if let Some(status) = child.try_wait().map_err(wait_error)? {
            return Ok(status);
        }

        info!("Stopping Keycloak (pid {pid})");
        if let Err(e) = request_termination(child) {
            warn!("Failed to signal Keycloak (pid {pid}): {e}");
        }

        let deadline = Instant::now() + self.grace_period;
        loop {
            if let Some(status) = child.try_wait().map_err(wait_error)? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                warn!(
                    "Keycloak (pid {pid}) did not stop within {}s, killing it",
                    self.grace_period.as_secs()
                );
                if let Err(e) = child.kill() {
                    debug!("Kill failed for pid {pid}: {e}");
                }
                return child.wait().map_err(wait_error);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

fn ensure_idle(inner: &Inner) -> Result<()> {
    if inner.state == ProcessState::Idle {
        Ok(())
    } else {
        Err(KeycloakError::AlreadyStarted {
            state: inner.state.to_string(),
        })
    }
}
