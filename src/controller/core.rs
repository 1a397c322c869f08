use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use crate::{
    config::ControllerConfig,
    error::ConfigError,
    events::{ControllerEvent, Notifier},
};

use super::{
    admission::Admission,
    guard::{SlotGuard, WaitGuard},
    slot::{Release, SlotState},
};

/// Point-in-time view of a controller's occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Configured concurrency limit.
    pub limit: usize,
    /// Operations currently admitted and not yet settled.
    pub running: usize,
    /// Operations waiting for a slot.
    pub queued: usize,
}

/// State shared between the controller handle and its guards.
pub(super) struct Shared {
    name: Cow<'static, str>,
    limit: usize,
    state: Mutex<SlotState>,
    notifier: Notifier,
}

impl Shared {
    // The state is updated atomically inside each critical section and no user
    // code runs under the lock, so a poisoned mutex still holds consistent data.
    fn lock(&self) -> MutexGuard<'_, SlotState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: ControllerEvent) {
        self.notifier.emit(event.name());
    }

    /// Releases the slot held by a settled operation, handing it to the head of the queue if any.
    pub(super) fn release(&self, id: u64) {
        let Some(idle) = self.hand_off(id) else {
            return;
        };
        self.emit(ControllerEvent::Settled);
        if idle {
            self.emit(ControllerEvent::Idle);
        }
    }

    /// Passes on a slot that was granted to a waiter which never resumed.
    ///
    /// Nothing ran in that slot, so no `Settled` event is emitted.
    pub(super) fn pass_on(&self, id: u64) {
        let Some(idle) = self.hand_off(id) else {
            return;
        };
        debug!(controller = %self.name, id, "granted slot passed on unused");
        if idle {
            self.emit(ControllerEvent::Idle);
        }
    }

    /// Hands the slot held by `id` to the first live waiter.
    ///
    /// Returns whether the controller is idle afterwards, or `None` if `id` was not tracked.
    fn hand_off(&self, id: u64) -> Option<bool> {
        let (outcome, idle) = {
            let mut state = self.lock();
            let outcome = state.release(id);
            (outcome, state.is_idle())
        };

        match outcome {
            Release::Stale => {
                trace!(controller = %self.name, id, "untracked operation settled");
                return None;
            }
            Release::HandedOff(next) => {
                debug!(controller = %self.name, id, next, "slot handed off");
            }
            Release::Freed => {
                trace!(controller = %self.name, id, "slot freed");
            }
        }
        Some(idle)
    }

    /// Removes a queued entry whose caller stopped waiting.
    pub(super) fn withdraw(&self, id: u64) {
        if self.lock().withdraw(id) {
            debug!(controller = %self.name, id, "queued operation withdrawn");
        }
    }
}

/// FIFO admission controller.
///
/// Bounds how many operations submitted through [`add`](Self::add) run at once.
/// Excess submissions wait in a queue and are admitted strictly in arrival order
/// as running operations settle.
///
/// The handle is cheap to clone; clones share the same budget and queue.
///
/// ## Example
/// ```rust
/// use callgate::AdmissionController;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let gate = AdmissionController::new(2).unwrap();
///
/// let ok: Result<&str, String> = gate.add(|| async { Ok("pong") }).await;
/// assert_eq!(ok, Ok("pong"));
///
/// let err: Result<(), String> = gate.add(|| async { Err("boom".to_string()) }).await;
/// assert_eq!(err, Err("boom".to_string()));
/// assert_eq!(gate.running(), 0);
/// # }
/// ```
#[derive(Clone)]
pub struct AdmissionController {
    shared: Arc<Shared>,
}

impl AdmissionController {
    /// Creates a controller that runs at most `limit` operations at once.
    ///
    /// ### Errors
    /// [`ConfigError::ZeroLimit`] if `limit == 0`.
    pub fn new(limit: usize) -> Result<Self, ConfigError> {
        Self::with_config(ControllerConfig::new(limit))
    }

    /// Creates a controller from a full configuration.
    ///
    /// ### Errors
    /// Whatever [`ControllerConfig::validate`] rejects.
    pub fn with_config(config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            shared: Arc::new(Shared {
                name: config.name,
                limit: config.limit,
                state: Mutex::new(SlotState::new()),
                notifier: Notifier::new(),
            }),
        })
    }

    /// Submits `operation` and resolves to its output once it has run.
    ///
    /// The operation is invoked immediately if a slot is free, otherwise after every
    /// operation submitted before it has been admitted. Its output (including an `Err`)
    /// is returned unchanged; the controller adds no error of its own.
    ///
    /// The slot is released when the operation settles, when it panics, or when the
    /// returned future is dropped. A queued submission whose future is dropped leaves
    /// the queue without running.
    pub async fn add<F, Fut>(&self, operation: F) -> Fut::Output
    where
        F: FnOnce() -> Fut,
        Fut: Future,
    {
        let _slot = self.admit().await;
        operation().await
    }

    async fn admit(&self) -> SlotGuard {
        loop {
            let admission = self.shared.lock().admit(self.shared.limit);

            match admission {
                Admission::Admitted(id) => {
                    trace!(controller = %self.shared.name, id, "operation admitted");
                    let slot = SlotGuard::new(Arc::clone(&self.shared), id);
                    self.shared.emit(ControllerEvent::Admitted);
                    return slot;
                }
                Admission::Queued { id, wake } => {
                    debug!(controller = %self.shared.name, id, "no free slot; operation queued");
                    let waiter = WaitGuard::new(Arc::clone(&self.shared), id, wake);
                    self.shared.emit(ControllerEvent::Queued);

                    if let Some(slot) = waiter.wait().await {
                        trace!(controller = %self.shared.name, id, "queued operation admitted");
                        self.shared.emit(ControllerEvent::Admitted);
                        return slot;
                    }
                    debug!(
                        controller = %self.shared.name,
                        id,
                        "wait queue discarded by reset; resubmitting"
                    );
                }
            }
        }
    }

    /// Discards all bookkeeping.
    ///
    /// Afterwards `running()` and `queued()` are both zero and every listener registered
    /// on [`notifier`](Self::notifier) is gone.
    ///
    /// - Operations already running are **not** cancelled. They finish on their own and
    ///   their settlement no longer frees a slot or wakes anyone.
    /// - Operations that were waiting resubmit themselves against the fresh state the next
    ///   time their task is polled; their relative order is not preserved.
    pub fn reset(&self) {
        let (running, queued) = self.shared.lock().reset();
        self.shared.notifier.clear();
        debug!(
            controller = %self.shared.name,
            running,
            queued,
            "controller reset; bookkeeping discarded"
        );
    }

    /// Configured concurrency limit.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.shared.limit
    }

    /// Number of admitted operations that have not settled.
    #[must_use]
    pub fn running(&self) -> usize {
        self.shared.lock().running.len()
    }

    /// Number of operations waiting for a slot.
    #[must_use]
    pub fn queued(&self) -> usize {
        self.shared.lock().queue.len()
    }

    /// Number of free slots.
    #[must_use]
    pub fn available(&self) -> usize {
        self.shared.limit.saturating_sub(self.running())
    }

    /// True if nothing is running and nothing is queued.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.shared.lock().is_idle()
    }

    /// Running and queued counts read under one lock.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let state = self.shared.lock();
        Snapshot {
            limit: self.shared.limit,
            running: state.running.len(),
            queued: state.queue.len(),
        }
    }

    /// Controller name used in log records.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Notifier the controller publishes [`ControllerEvent`]s on.
    pub fn notifier(&self) -> &Notifier {
        &self.shared.notifier
    }

    /// Non-owning handle, for listeners that must not keep the controller alive.
    #[cfg_attr(not(feature = "logging"), allow(dead_code))]
    pub(crate) fn downgrade(&self) -> WeakController {
        WeakController {
            shared: Arc::downgrade(&self.shared),
        }
    }
}

impl fmt::Debug for AdmissionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snap = self.snapshot();
        f.debug_struct("AdmissionController")
            .field("name", &self.shared.name)
            .field("limit", &snap.limit)
            .field("running", &snap.running)
            .field("queued", &snap.queued)
            .finish()
    }
}

/// Weak counterpart of [`AdmissionController`].
#[cfg_attr(not(feature = "logging"), allow(dead_code))]
pub(crate) struct WeakController {
    shared: std::sync::Weak<Shared>,
}

#[cfg_attr(not(feature = "logging"), allow(dead_code))]
impl WeakController {
    pub(crate) fn upgrade(&self) -> Option<AdmissionController> {
        self.shared
            .upgrade()
            .map(|shared| AdmissionController { shared })
    }
}
