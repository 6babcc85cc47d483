// Preview refresh scheduling
//
// Debouncer keeps at most one pending timer per key: scheduling a key aborts
// its pending timer before arming a new one, so only the last request of a
// quiet window runs.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::Settings;

/// Default quiet window before the preview refreshes (300ms)
pub const DEFAULT_PREVIEW_DEBOUNCE_MS: u64 = 300;

/// Debounce key used for preview refreshes
pub const PREVIEW_REFRESH_KEY: &str = "preview-refresh";

/// Errors from the preview scheduler
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    /// No tokio runtime is available to run timers
    #[error("No async runtime available for debounced timers")]
    NoRuntime,
}

/// Collaborator that refreshes the rendered preview
pub trait PreviewScheduler: Send + Sync {
    /// Request a refresh; fire-and-forget, debounced by the implementation
    fn schedule_refresh(&self);
}

/// A pending timer for one key
struct Pending {
    generation: u64,
    task: JoinHandle<()>,
}

/// Single-pending-timer-per-key primitive on a tokio runtime
pub struct Debouncer {
    runtime: Handle,
    pending: Arc<Mutex<HashMap<String, Pending>>>,
    next_generation: AtomicU64,
}

impl Debouncer {
    /// Create a debouncer that spawns timers on `runtime`
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            pending: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Create a debouncer on the runtime of the current context
    pub fn current() -> Result<Self, SchedulerError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| SchedulerError::NoRuntime)
    }

    /// Run `action` after `delay`, cancelling any pending action for `key`
    pub fn schedule<F>(&self, key: &str, delay: Duration, action: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);

        // Held across spawn so the timer cannot observe the map before insert
        let mut pending = self.pending.lock();
        if let Some(previous) = pending.remove(key) {
            previous.task.abort();
            crate::trace!("Debounce '{}' restarted", key);
        }

        let map = Arc::clone(&self.pending);
        let owned_key = key.to_string();
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut pending = map.lock();
                match pending.get(&owned_key) {
                    Some(current) if current.generation == generation => {
                        pending.remove(&owned_key);
                    }
                    // Superseded between wake-up and lock
                    _ => return,
                }
            }
            action();
        });

        pending.insert(key.to_string(), Pending { generation, task });
    }

    /// Cancel the pending action for `key`
    ///
    /// Returns true if an action was pending.
    pub fn cancel(&self, key: &str) -> bool {
        match self.pending.lock().remove(key) {
            Some(previous) => {
                previous.task.abort();
                true
            }
            None => false,
        }
    }

    /// Number of keys with a pending action
    pub fn pending_count(&self) -> usize {
        self.pending.lock().len()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        for (_, pending) in self.pending.lock().drain() {
            pending.task.abort();
        }
    }
}

/// Debounced preview refresh driven by a host-supplied callback
pub struct DebouncedPreview {
    debouncer: Debouncer,
    window: Duration,
    refresh: Arc<dyn Fn() + Send + Sync>,
}

impl DebouncedPreview {
    pub fn new<F>(debouncer: Debouncer, window: Duration, refresh: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            debouncer,
            window,
            refresh: Arc::new(refresh),
        }
    }

    /// Preview using the configured quiet window
    pub fn from_settings<F>(debouncer: Debouncer, settings: &Settings, refresh: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self::new(debouncer, settings.preview_debounce(), refresh)
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Drop a pending refresh, if any
    pub fn cancel(&self) -> bool {
        self.debouncer.cancel(PREVIEW_REFRESH_KEY)
    }

    pub fn is_pending(&self) -> bool {
        self.debouncer.pending_count() > 0
    }
}

impl PreviewScheduler for DebouncedPreview {
    fn schedule_refresh(&self) {
        let refresh = Arc::clone(&self.refresh);
        self.debouncer
            .schedule(PREVIEW_REFRESH_KEY, self.window, move || refresh());
    }
}

/// Scheduler that does nothing, for hosts without a preview
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPreview;

impl PreviewScheduler for NoPreview {
    fn schedule_refresh(&self) {}
}

#[cfg(test)]
#[path = "preview_test.rs"]
mod tests;
