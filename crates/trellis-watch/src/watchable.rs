//! A value container that notifies listeners when the value changes.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use tracing::trace;

/// Listener callback type for a [`Watchable`].
pub type WatchFn<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Lifecycle hook callback type for a [`Watchable`].
pub type HookFn = Box<dyn Fn() + Send + Sync>;

/// Registration handle for a listener.
///
/// Returned by [`Watchable::watch`] and passed to [`Watchable::unwatch`].
/// Handles are unique per container, so registering the same closure twice
/// yields two independent registrations with distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WatchId(u64);

/// Optional lifecycle hooks for a [`Watchable`].
///
/// `on_first_watch` fires when the listener set goes from empty to
/// non-empty, before the registration completes; `on_last_watch` fires when
/// the last listener is removed. The intended use is lazy acquisition and
/// release of an underlying live resource, e.g. a host-side subscription
/// that is only worth holding while someone is actually watching.
#[derive(Default)]
pub struct WatchHooks {
    on_first_watch: Option<HookFn>,
    on_last_watch: Option<HookFn>,
}

impl WatchHooks {
    /// Create an empty hook set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hook fired when the listener count goes from zero to one.
    #[must_use]
    pub fn on_first_watch(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_first_watch = Some(Box::new(hook));
        self
    }

    /// Set the hook fired when the listener count returns to zero.
    #[must_use]
    pub fn on_last_watch(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_last_watch = Some(Box::new(hook));
        self
    }
}

impl std::fmt::Debug for WatchHooks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchHooks")
            .field("on_first_watch", &self.on_first_watch.is_some())
            .field("on_last_watch", &self.on_last_watch.is_some())
            .finish()
    }
}

/// A value container that notifies listeners when the value changes.
///
/// The container owns a current value of type `T` and a set of listener
/// callbacks. Assigning a value equal to the current one (per `PartialEq`)
/// is a no-op: no listener observes a change that did not pass the equality
/// check. All operations are synchronous and total.
///
/// Listeners may register and unregister other listeners (or themselves)
/// while a notification pass is in flight; the pass iterates a snapshot of
/// the listener set taken when the value was stored.
pub struct Watchable<T> {
    state: RwLock<State<T>>,
    next_id: AtomicU64,
    hooks: WatchHooks,
}

struct State<T> {
    value: T,
    listeners: HashMap<WatchId, WatchFn<T>>,
}

impl<T: std::fmt::Debug> std::fmt::Debug for Watchable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read().expect("lock poisoned");
        f.debug_struct("Watchable")
            .field("value", &state.value)
            .field("listener_count", &state.listeners.len())
            .finish_non_exhaustive()
    }
}

impl<T> Watchable<T> {
    /// Create a new watchable holding `initial`, with no lifecycle hooks.
    pub fn new(initial: T) -> Self {
        Self::with_hooks(initial, WatchHooks::new())
    }

    /// Create a new watchable holding `initial` with the given lifecycle
    /// hooks.
    pub fn with_hooks(initial: T, hooks: WatchHooks) -> Self {
        Self {
            state: RwLock::new(State {
                value: initial,
                listeners: HashMap::new(),
            }),
            next_id: AtomicU64::new(0),
            hooks,
        }
    }

    /// Run `f` against a borrow of the current value.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let state = self.state.read().expect("lock poisoned");
        f(&state.value)
    }

    /// Register a listener, returning a handle for [`unwatch`](Self::unwatch).
    ///
    /// If this registration takes the listener set from empty to non-empty,
    /// the `on_first_watch` hook fires before the registration completes.
    /// The hook runs with the internal lock held and must not call back into
    /// this container.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn watch(&self, listener: impl Fn(&T) + Send + Sync + 'static) -> WatchId {
        let id = WatchId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut state = self.state.write().expect("lock poisoned");
        if state.listeners.is_empty()
            && let Some(hook) = &self.hooks.on_first_watch
        {
            trace!("First listener attached, firing on_first_watch");
            hook();
        }
        state.listeners.insert(id, Arc::new(listener));
        id
    }

    /// Remove a listener. Returns `true` if the handle was registered.
    ///
    /// If this removal empties the listener set, the `on_last_watch` hook
    /// fires. The hook runs with the internal lock held and must not call
    /// back into this container. Unwatching an unknown handle does nothing
    /// and never fires the hook.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn unwatch(&self, id: WatchId) -> bool {
        let mut state = self.state.write().expect("lock poisoned");
        let removed = state.listeners.remove(&id).is_some();
        if removed
            && state.listeners.is_empty()
            && let Some(hook) = &self.hooks.on_last_watch
        {
            trace!("Last listener detached, firing on_last_watch");
            hook();
        }
        removed
    }

    /// Number of registered listeners.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn watcher_count(&self) -> usize {
        self.state.read().expect("lock poisoned").listeners.len()
    }
}

impl<T: Clone + PartialEq> Watchable<T> {
    /// The current value.
    ///
    /// Could return stale data between reads; callers that need to track
    /// changes should [`watch`](Self::watch) instead of polling.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn value(&self) -> T {
        self.state.read().expect("lock poisoned").value.clone()
    }

    /// Assign a new value, notifying listeners if it differs from the
    /// current one.
    ///
    /// Equal assignments (per `PartialEq`) are silently dropped. When the
    /// value does change, every listener registered at the moment of the
    /// change is invoked synchronously with the new value, in no particular
    /// order. Listeners run outside the internal lock, so they may freely
    /// watch, unwatch, or assign again; a reassignment from inside a
    /// listener notifies the snapshot of the pass it starts, not the one in
    /// flight.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn set(&self, value: T) {
        let snapshot: Vec<WatchFn<T>> = {
            let mut state = self.state.write().expect("lock poisoned");
            if state.value == value {
                return;
            }
            state.value = value.clone();
            state.listeners.values().cloned().collect()
        };

        trace!(listeners = snapshot.len(), "Watchable value changed");
        for listener in snapshot {
            listener(&value);
        }
    }
}

#[cfg(test)]
#[path = "watchable_tests.rs"]
mod tests;
