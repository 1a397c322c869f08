//! # LogWriter — lifecycle event logger
//!
//! A minimal observer that logs every [`ControllerEvent`] a controller emits, together
//! with the occupancy at that moment. Use it for tests or demos.
//!
//! ## Example output
//! ```text
//! INFO callgate: [queued] controller="search" running=2 queued=1
//! INFO callgate: [admitted] controller="search" running=2 queued=0
//! INFO callgate: [settled] controller="search" running=1 queued=0
//! INFO callgate: [idle] controller="search"
//! ```

use tracing::info;

use crate::controller::{AdmissionController, WeakController};
use crate::events::{ControllerEvent, listener};

/// Event logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Registers one listener per [`ControllerEvent`] on the controller's notifier.
    ///
    /// The listeners hold the controller weakly. [`AdmissionController::reset`] drops
    /// them along with every other listener; attach again after a reset.
    pub fn attach(&self, controller: &AdmissionController) {
        for event in ControllerEvent::ALL {
            let weak = controller.downgrade();
            controller
                .notifier()
                .on(event.name(), listener(move || write(event, &weak)));
        }
    }
}

fn write(event: ControllerEvent, weak: &WeakController) {
    let Some(gate) = weak.upgrade() else { return };
    let snap = gate.snapshot();

    match event {
        ControllerEvent::Idle => {
            info!(target: "callgate", controller = gate.name(), "[idle]");
        }
        ControllerEvent::Queued | ControllerEvent::Admitted | ControllerEvent::Settled => {
            info!(
                target: "callgate",
                controller = gate.name(),
                running = snap.running,
                queued = snap.queued,
                "[{event}]"
            );
        }
    }
}
