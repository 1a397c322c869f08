//! RAII guards that keep slot accounting exact when futures are dropped.
//!
//! - [`SlotGuard`] owns one running slot; dropping it (settlement, panic, or the
//!   `add()` future being dropped) releases the slot exactly once.
//! - [`WaitGuard`] owns one wait-queue entry; dropping it before the wake is consumed
//!   either withdraws the entry or passes an already granted slot on.

use std::sync::Arc;

use tokio::sync::oneshot;

use super::core::Shared;

/// Occupied slot. Released on drop.
pub(super) struct SlotGuard {
    shared: Arc<Shared>,
    id: u64,
}

impl SlotGuard {
    pub fn new(shared: Arc<Shared>, id: u64) -> Self {
        Self { shared, id }
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.shared.release(self.id);
    }
}

/// Pending wait-queue entry.
pub(super) struct WaitGuard {
    shared: Arc<Shared>,
    id: u64,
    wake: oneshot::Receiver<()>,
    armed: bool,
}

impl WaitGuard {
    pub fn new(shared: Arc<Shared>, id: u64, wake: oneshot::Receiver<()>) -> Self {
        Self {
            shared,
            id,
            wake,
            armed: true,
        }
    }

    /// Waits for the wake signal.
    ///
    /// `Some(slot)` once the slot has been transferred to this entry,
    /// `None` if the queue was discarded by a reset.
    pub async fn wait(mut self) -> Option<SlotGuard> {
        let woken = (&mut self.wake).await.is_ok();
        self.armed = false;
        woken.then(|| SlotGuard::new(Arc::clone(&self.shared), self.id))
    }
}

impl Drop for WaitGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        self.wake.close();
        match self.wake.try_recv() {
            // Woken but never resumed: the slot is ours, pass it on.
            Ok(()) => self.shared.pass_on(self.id),
            Err(_) => self.shared.withdraw(self.id),
        }
    }
}
