//! # Lifecycle events published by the controller.
//!
//! Every [`AdmissionController`](crate::AdmissionController) owns a
//! [`Notifier`](crate::Notifier) and emits these names on it. Listeners take no
//! arguments; read [`AdmissionController::snapshot`](crate::AdmissionController::snapshot)
//! from inside a listener if you need the counts (events fire after the state lock is released).
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use callgate::{AdmissionController, ControllerEvent, listener};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let gate = AdmissionController::new(2).unwrap();
//! let admitted = Arc::new(AtomicUsize::new(0));
//!
//! let counter = Arc::clone(&admitted);
//! gate.notifier().on(
//!     ControllerEvent::Admitted.name(),
//!     listener(move || { counter.fetch_add(1, Ordering::SeqCst); }),
//! );
//!
//! let out = gate.add(|| async { 42 }).await;
//! assert_eq!(out, 42);
//! assert_eq!(admitted.load(Ordering::SeqCst), 1);
//! # }
//! ```

use std::fmt;

/// Classification of controller lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerEvent {
    /// An operation found no free slot and was appended to the wait queue.
    Queued,

    /// An operation was admitted, either on submission or after waiting.
    Admitted,

    /// A running operation settled (success, failure, panic or drop) and released its slot.
    Settled,

    /// A settlement left the controller with nothing running and nothing queued.
    Idle,
}

impl ControllerEvent {
    /// Every event kind, in lifecycle order.
    pub const ALL: [ControllerEvent; 4] = [
        ControllerEvent::Queued,
        ControllerEvent::Admitted,
        ControllerEvent::Settled,
        ControllerEvent::Idle,
    ];

    /// Event name used as the [`Notifier`](crate::Notifier) key.
    pub const fn name(self) -> &'static str {
        match self {
            ControllerEvent::Queued => "queued",
            ControllerEvent::Admitted => "admitted",
            ControllerEvent::Settled => "settled",
            ControllerEvent::Idle => "idle",
        }
    }
}

impl fmt::Display for ControllerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_distinct() {
        let names: HashSet<_> = ControllerEvent::ALL.iter().map(|e| e.name()).collect();
        assert_eq!(names.len(), ControllerEvent::ALL.len());
    }

    #[test]
    fn test_display_matches_name() {
        for ev in ControllerEvent::ALL {
            assert_eq!(ev.to_string(), ev.name());
        }
    }
}
