//! # Admission controller.
//!
//! [`AdmissionController`] caps how many submitted operations run at once and admits
//! the excess in strict arrival order.
//!
//! ## Architecture
//! ```text
//! add(op) ──► SlotState::admit()
//!               ├─ running < limit ──► Admitted(id) ──► SlotGuard ──► op().await
//!               │                                          │
//!               │                                          └─ drop ──► release(id)
//!               │                                                       ├─ queue empty ──► slot freed
//!               │                                                       └─ head waiter ──► wake.send()
//!               │                                                                    (slot transferred)
//!               └─ otherwise ──► Queued(id, wake) ──► WaitGuard::wait()
//!                                                       ├─ woken ──► SlotGuard ──► op().await
//!                                                       └─ closed by reset() ──► admit again
//! ```
//!
//! ## Rules
//! - `running <= limit` at all times.
//! - A freed slot goes straight to the head of the queue; newcomers queue behind it.
//! - Every path out of `add()` (success, error, panic, dropped future) releases
//!   exactly what it holds.

mod admission;
mod core;
mod guard;
mod slot;

pub use self::core::{AdmissionController, Snapshot};

#[cfg(feature = "logging")]
pub(crate) use self::core::WeakController;
