//! # Named-event notifier.
//!
//! [`Notifier`] is a small synchronous publish/subscribe facility keyed by event name.
//! The controller publishes its lifecycle events through one (see
//! [`ControllerEvent`](crate::ControllerEvent)); it is equally usable on its own.
//!
//! ## Rules
//! - **Registration order**: listeners fire in the order they were registered.
//! - **Snapshot emit**: `emit()` fires the listeners registered when it was called;
//!   registrations made by a listener take effect from the next emission.
//! - **Re-entrant**: listeners run outside the internal lock and may call
//!   `on`/`off`/`once`/`emit` on the same notifier.
//! - **Identity**: `off()` compares listeners by `Arc` pointer, so keep the [`Listener`]
//!   handle you registered if you intend to remove it.
//! - **One-shot**: `once()` registers a wrapper that is unregistered by the first emission,
//!   before the listener runs; concurrent emissions cannot fire it twice.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use callgate::{Notifier, listener};
//!
//! let hits = Arc::new(AtomicUsize::new(0));
//! let notifier = Notifier::new();
//!
//! let counter = Arc::clone(&hits);
//! let l = listener(move || { counter.fetch_add(1, Ordering::SeqCst); });
//!
//! notifier.on("ping", l.clone());
//! notifier.emit("ping");
//! notifier.off("ping", &l);
//! notifier.emit("ping");
//!
//! assert_eq!(hits.load(Ordering::SeqCst), 1);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Shared listener callback.
pub type Listener = Arc<dyn Fn() + Send + Sync + 'static>;

/// Wraps a closure into a [`Listener`].
pub fn listener<F>(f: F) -> Listener
where
    F: Fn() + Send + Sync + 'static,
{
    Arc::new(f)
}

#[derive(Clone)]
struct Registration {
    listener: Listener,
    once: bool,
}

/// Named-event publish/subscribe facility.
#[derive(Default)]
pub struct Notifier {
    listeners: Mutex<HashMap<String, Vec<Registration>>>,
}

impl Notifier {
    /// Creates a notifier with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `listener` to the list for `name`.
    ///
    /// No uniqueness check: registering the same listener twice makes it fire twice.
    pub fn on(&self, name: impl Into<String>, listener: Listener) {
        self.register(name.into(), listener, false);
    }

    /// Registers `listener` to fire on the next emission of `name` only.
    ///
    /// A wrapper around `listener` is what gets registered, so
    /// [`off`](Self::off) with the original listener does not remove it.
    pub fn once(&self, name: impl Into<String>, listener: Listener) {
        let wrapper: Listener = Arc::new(move || listener());
        self.register(name.into(), wrapper, true);
    }

    /// Removes every persistent registration of `listener` under `name`.
    ///
    /// No-op if the listener is not registered.
    pub fn off(&self, name: &str, listener: &Listener) {
        let mut map = self.lock();
        let Some(regs) = map.get_mut(name) else {
            return;
        };
        regs.retain(|r| !Arc::ptr_eq(&r.listener, listener));
        if regs.is_empty() {
            map.remove(name);
        }
    }

    /// Invokes every listener currently registered for `name`, in registration order.
    ///
    /// Returns the number of listeners invoked.
    pub fn emit(&self, name: &str) -> usize {
        let fired: Vec<Listener> = {
            let mut map = self.lock();
            let Some(regs) = map.get_mut(name) else {
                return 0;
            };
            let fired = regs.iter().map(|r| Arc::clone(&r.listener)).collect();
            regs.retain(|r| !r.once);
            if regs.is_empty() {
                map.remove(name);
            }
            fired
        };

        for l in &fired {
            l();
        }
        fired.len()
    }

    /// Number of listeners registered for `name` (one-shot included).
    #[must_use]
    pub fn listener_count(&self, name: &str) -> usize {
        self.lock().get(name).map_or(0, Vec::len)
    }

    /// True if no listener is registered under any name.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops every registration.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn register(&self, name: String, listener: Listener, once: bool) {
        self.lock()
            .entry(name)
            .or_default()
            .push(Registration { listener, once });
    }

    // Listeners never run under the lock, so poisoning can only come from a
    // panic between two consistent states; the map is still usable.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Registration>>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Notifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let map = self.lock();
        let mut names: Vec<(&str, usize)> =
            map.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
        names.sort_unstable();
        f.debug_struct("Notifier").field("listeners", &names).finish()
    }
}
