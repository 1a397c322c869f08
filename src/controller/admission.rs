//! # Admission decision
//!
//! On submission the controller either admits the operation into a free slot, or
//! appends it to the wait queue together with a single-use wake signal.
//!
//! ## Invariants
//! - Queued operations are admitted strictly in submission order.
//! - A freed slot is handed directly to the head of the queue, so a newcomer can
//!   never take it ahead of an operation that is already waiting.

use tokio::sync::oneshot;

/// Result of a single admission attempt.
#[derive(Debug)]
pub(super) enum Admission {
    /// A slot was free; the operation may run now.
    Admitted(u64),

    /// No slot was free; the operation waits for `wake`.
    ///
    /// A value on `wake` means the slot has already been transferred to `id`.
    /// A closed channel means the queue was discarded by `reset()`.
    Queued {
        id: u64,
        wake: oneshot::Receiver<()>,
    },
}
