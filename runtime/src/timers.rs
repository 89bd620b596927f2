//! Registry of running interval effects
//!
//! Every `Effect::Interval` and `Effect::Timeout` spawns a task whose abort
//! handle lives here under its [`TimerId`]. The registry is the only owner of
//! those tasks, so a timer stops exactly when a reducer cancels it, when it is
//! replaced, when the store shuts down, or (timeouts only) when it fires.

use eventdesk_core::effect::TimerId;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::task::{AbortHandle, JoinHandle};

#[derive(Debug)]
struct Registration {
    token: u64,
    handle: AbortHandle,
}

/// Shared map of timer ids to the tasks driving them
#[derive(Clone, Default)]
pub struct TimerRegistry {
    tasks: Arc<Mutex<HashMap<TimerId, Registration>>>,
    tokens: Arc<AtomicU64>,
}

impl TimerRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<TimerId, Registration>> {
        // A poisoned map still holds valid handles
        self.tasks
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Spawn a task through `spawn` and register it under `id`, aborting any
    /// task it replaces
    ///
    /// `spawn` receives the registration token the task passes to
    /// [`TimerRegistry::release`] when it finishes on its own. The registry
    /// stays locked while the task is spawned, so a release can never run
    /// ahead of the registration.
    pub fn start<F>(&self, id: TimerId, spawn: F) -> JoinHandle<()>
    where
        F: FnOnce(u64) -> JoinHandle<()>,
    {
        let token = self.tokens.fetch_add(1, Ordering::Relaxed);
        let (task, previous) = {
            let mut tasks = self.lock();
            let task = spawn(token);
            let previous = tasks.insert(
                id.clone(),
                Registration {
                    token,
                    handle: task.abort_handle(),
                },
            );
            (task, previous)
        };
        self.record_gauge();
        if let Some(previous) = previous {
            tracing::debug!(timer = %id, "Replacing running timer");
            previous.handle.abort();
        }
        task
    }

    /// Forget the registration `token` under `id` without aborting it
    ///
    /// Called by a one-shot task that has fired. Returns `false` when the id
    /// was cancelled or re-registered in the meantime.
    pub fn release(&self, id: &TimerId, token: u64) -> bool {
        let released = {
            let mut tasks = self.lock();
            if tasks.get(id).is_some_and(|registration| registration.token == token) {
                tasks.remove(id);
                true
            } else {
                false
            }
        };
        if released {
            self.record_gauge();
            tracing::trace!(timer = %id, "Timer finished");
        }
        released
    }

    /// Abort and forget the task registered under `id`
    ///
    /// Returns `true` when a timer was running.
    pub fn cancel(&self, id: &TimerId) -> bool {
        let removed = self.lock().remove(id);
        self.record_gauge();
        match removed {
            Some(registration) => {
                registration.handle.abort();
                tracing::debug!(timer = %id, "Timer cancelled");
                true
            },
            None => {
                tracing::trace!(timer = %id, "Cancel for unknown timer ignored");
                false
            },
        }
    }

    /// Abort every registered task, returning how many were running
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<_> = self.lock().drain().collect();
        self.record_gauge();
        for (_, registration) in &drained {
            registration.handle.abort();
        }
        drained.len()
    }

    /// Whether a timer is registered under `id`
    #[must_use]
    pub fn contains(&self, id: &TimerId) -> bool {
        self.lock().contains_key(id)
    }

    /// Number of registered timers
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no timers are registered
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Ids of all registered timers, sorted
    #[must_use]
    pub fn ids(&self) -> Vec<TimerId> {
        let mut ids: Vec<_> = self.lock().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn record_gauge(&self) {
        // Note: Precision loss acceptable for metrics (timer counts < 2^52)
        #[allow(clippy::cast_precision_loss)]
        metrics::gauge!("store.timers.active").set(self.len() as f64);
    }
}

impl std::fmt::Debug for TimerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn parked(_token: u64) -> JoinHandle<()> {
        tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        })
    }

    #[tokio::test]
    async fn test_cancel_aborts_task() {
        let registry = TimerRegistry::new();
        let id = TimerId::new("countdown-1");
        let task = registry.start(id.clone(), parked);

        assert!(registry.contains(&id));

        assert!(registry.cancel(&id));
        assert!(registry.is_empty());
        let result = task.await;
        assert!(matches!(result, Err(err) if err.is_cancelled()));

        // Second cancel is a no-op
        assert!(!registry.cancel(&id));
    }

    #[tokio::test]
    async fn test_start_replaces_previous() {
        let registry = TimerRegistry::new();
        let id = TimerId::new("countdown-1");

        let first = registry.start(id.clone(), parked);
        let second = registry.start(id.clone(), parked);
        assert_eq!(registry.len(), 1);

        let result = first.await;
        assert!(matches!(result, Err(err) if err.is_cancelled()));
        assert!(!second.is_finished());

        assert_eq!(registry.cancel_all(), 1);
    }

    #[tokio::test]
    async fn test_release_only_forgets_own_registration() {
        let registry = TimerRegistry::new();
        let id = TimerId::new("toast-1");

        let mut first_token = None;
        let _first = registry.start(id.clone(), |token| {
            first_token = Some(token);
            parked(token)
        });
        let first_token = first_token.unwrap_or_default();

        let mut second_token = None;
        let _second = registry.start(id.clone(), |token| {
            second_token = Some(token);
            parked(token)
        });
        let second_token = second_token.unwrap_or_default();
        assert_ne!(first_token, second_token);

        // The replaced task cannot drop its successor
        assert!(!registry.release(&id, first_token));
        assert!(registry.contains(&id));

        assert!(registry.release(&id, second_token));
        assert!(registry.is_empty());
        assert!(!registry.release(&id, second_token));
    }

    #[tokio::test]
    async fn test_ids_sorted() {
        let registry = TimerRegistry::new();
        let _b = registry.start(TimerId::new("b"), parked);
        let _a = registry.start(TimerId::new("a"), parked);

        assert_eq!(registry.ids(), vec![TimerId::new("a"), TimerId::new("b")]);
        assert_eq!(registry.cancel_all(), 2);
    }
}
