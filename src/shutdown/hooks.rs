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

use log::{debug, warn};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Once, OnceLock};

pub type HookId = u64;

type Hook = Arc<dyn Fn() + Send + Sync>;

/// Cleanup callbacks keyed by registration id.
#[derive(Default)]
pub struct ShutdownRegistry {
    hooks: Mutex<BTreeMap<HookId, Hook>>,
    next_id: AtomicU64,
}

impl ShutdownRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, hook: impl Fn() + Send + Sync + 'static) -> HookId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.hooks().insert(id, Arc::new(hook));
        id
    }

    /// Returns `false` if the hook was unknown or already ran.
    pub fn deregister(&self, id: HookId) -> bool {
        self.hooks().remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.hooks().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run every registered hook once, in registration order.
    ///
    /// Hooks are taken out of the registry before they run, so a hook may
    /// deregister itself (or anything else) without deadlocking.
    pub fn run_all(&self) -> usize {
        let hooks: Vec<Hook> = std::mem::take(&mut *self.hooks()).into_values().collect();
        let count = hooks.len();
        for hook in hooks {
            hook();
        }
        count
    }

    fn hooks(&self) -> MutexGuard<'_, BTreeMap<HookId, Hook>> {
        self.hooks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

static GLOBAL_REGISTRY: OnceLock<ShutdownRegistry> = OnceLock::new();
static WATCHERS: Once = Once::new();

fn global() -> &'static ShutdownRegistry {
    GLOBAL_REGISTRY.get_or_init(ShutdownRegistry::new)
}

/// Register a callback with the process-wide registry.
///
/// The first registration installs the signal watcher thread and the
/// process-exit handler.
pub fn register(hook: impl Fn() + Send + Sync + 'static) -> HookId {
    ensure_watchers();
    global().register(hook)
}

/// Install the signal watcher and process-exit handler if not done yet.
///
/// Any code that installs its own handlers for the termination signals must
/// call this first, so the default action is still taken after hooks ran.
pub(crate) fn ensure_watchers() {
    WATCHERS.call_once(install_watchers);
}

pub fn deregister(id: HookId) -> bool {
    global().deregister(id)
}

/// Run all pending process-wide hooks now.
pub fn run_hooks() -> usize {
    match GLOBAL_REGISTRY.get() {
        Some(registry) => registry.run_all(),
        None => 0,
    }
}

#[cfg(unix)]
fn install_watchers() {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;
    use signal_hook::low_level::emulate_default_handler;

    match Signals::new([SIGINT, SIGTERM, SIGHUP]) {
        Ok(mut signals) => {
            let spawned = std::thread::Builder::new()
                .name("keycloak-shutdown".to_string())
                .spawn(move || {
                    if let Some(signal) = signals.forever().next() {
                        debug!("Received signal {signal}, running shutdown hooks");
                        run_hooks();
                        if let Err(e) = emulate_default_handler(signal) {
                            warn!("Failed to re-raise signal {signal}: {e}");
                            std::process::exit(128 + signal);
                        }
                    }
                });
            if let Err(e) = spawned {
                warn!("Failed to start shutdown signal watcher: {e}");
            }
        }
        Err(e) => warn!("Failed to register shutdown signal handlers: {e}"),
    }

    extern "C" fn run_hooks_at_exit() {
        run_hooks();
    }

    // SAFETY: registering a plain `extern "C"` function with no captured state.
    if unsafe { libc::atexit(run_hooks_at_exit) } != 0 {
        warn!("Failed to register process-exit handler");
    }
}

#[cfg(not(unix))]
fn install_watchers() {
    debug!("Signal-driven shutdown hooks are not available on this platform");
}
