use std::collections::{HashSet, VecDeque};

use tokio::sync::oneshot;

use super::admission::Admission;

/// Queued operation waiting for a slot.
pub(super) struct Waiter {
    /// Subscription id (unique per controller instance).
    pub id: u64,

    /// Single-use wake signal; sending on it transfers a slot to the waiter.
    pub wake: oneshot::Sender<()>,
}

/// Outcome of releasing a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Release {
    /// The id was not tracked (settled after a reset, or already released).
    Stale,

    /// The slot was transferred to the waiter with this id.
    HandedOff(u64),

    /// Nobody was waiting; the slot is free.
    Freed,
}

/// Bookkeeping guarded by the controller's mutex.
///
/// Invariant: `running.len() < limit` implies `queue.is_empty()`.
pub(super) struct SlotState {
    /// Ids of admitted, not yet settled operations.
    pub running: HashSet<u64>,

    /// Waiters in arrival order.
    pub queue: VecDeque<Waiter>,

    /// Next id to hand out. Never reset, so ids from before a reset cannot collide.
    next_id: u64,
}

impl SlotState {
    pub fn new() -> Self {
        Self {
            running: HashSet::new(),
            queue: VecDeque::new(),
            next_id: 0,
        }
    }

    /// Admits a new submission or appends it to the wait queue.
    pub fn admit(&mut self, limit: usize) -> Admission {
        self.next_id += 1;
        let id = self.next_id;

        if self.running.len() < limit {
            debug_assert!(self.queue.is_empty(), "free slot while operations wait");
            self.running.insert(id);
            return Admission::Admitted(id);
        }

        let (tx, rx) = oneshot::channel();
        self.queue.push_back(Waiter { id, wake: tx });
        Admission::Queued { id, wake: rx }
    }

    /// Releases the slot held by `id` and hands it to the first waiter still listening.
    pub fn release(&mut self, id: u64) -> Release {
        if !self.running.remove(&id) {
            return Release::Stale;
        }

        while let Some(waiter) = self.queue.pop_front() {
            self.running.insert(waiter.id);
            if waiter.wake.send(()).is_ok() {
                return Release::HandedOff(waiter.id);
            }
            // Receiver already gone; its slot moves on to the next waiter.
            self.running.remove(&waiter.id);
        }
        Release::Freed
    }

    /// Removes a waiter that gave up before being woken.
    pub fn withdraw(&mut self, id: u64) -> bool {
        match self.queue.iter().position(|w| w.id == id) {
            Some(pos) => self.queue.remove(pos).is_some(),
            None => false,
        }
    }

    /// Drops all bookkeeping; returns the discarded `(running, queued)` counts.
    ///
    /// Dropping the waiters closes their wake channels.
    pub fn reset(&mut self) -> (usize, usize) {
        let running = std::mem::take(&mut self.running).len();
        let queued = std::mem::take(&mut self.queue).len();
        (running, queued)
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty() && self.queue.is_empty()
    }
}
