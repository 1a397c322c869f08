//! Controller events: names and notifier.
//!
//! This module groups the lifecycle event **names** the controller publishes and the
//! **notifier** they are published on.
//!
//! ## Contents
//! - [`ControllerEvent`] lifecycle event classification
//! - [`Notifier`], [`Listener`], [`listener`] named-event publish/subscribe
//!
//! ## Quick reference
//! - **Publisher**: `AdmissionController` (queued/admitted/settled/idle).
//! - **Consumers**: user listeners registered through `AdmissionController::notifier()`,
//!   and the optional `LogWriter` observer.

mod event;
mod notifier;

pub use event::ControllerEvent;
pub use notifier::{Listener, Notifier, listener};
