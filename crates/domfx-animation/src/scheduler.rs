//! Host frame scheduling.
//!
//! The engine never runs its own loop. It asks the host for exactly one
//! upcoming frame via [`Scheduler::request_tick`]; the host answers by calling
//! `Animator::on_tick` (or `Animator::tick`) with that request's handle when
//! the frame arrives. This is the same contract as a browser's
//! `requestAnimationFrame`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

/// Handle for one requested frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(pub u64);

/// Host per-frame primitive.
pub trait Scheduler: Send {
    /// Arrange for one call to `Animator::on_tick` on the next frame, passing
    /// back the returned handle.
    fn request_tick(&mut self) -> TickHandle;

    /// Withdraw a previously requested frame. Hosts without cancellation may
    /// ignore this; the animator discards any tick whose handle is not the
    /// one it is currently waiting on.
    fn cancel_tick(&mut self, handle: TickHandle) {
        let _ = handle;
    }
}

#[derive(Debug, Default)]
struct ManualSchedulerState {
    next_handle: AtomicU64,
    requested: AtomicUsize,
    cancelled: AtomicUsize,
    /// Handle of the outstanding request, offset by one; 0 means none.
    pending: AtomicU64,
}

/// Scheduler that only records requests.
///
/// Tests hold a clone to observe how many frames the engine asked for and
/// whether one is outstanding; the test itself decides when to deliver it.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    state: Arc<ManualSchedulerState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of `request_tick` calls so far.
    pub fn requested(&self) -> usize {
        self.state.requested.load(Ordering::SeqCst)
    }

    /// Total number of `cancel_tick` calls so far.
    pub fn cancelled(&self) -> usize {
        self.state.cancelled.load(Ordering::SeqCst)
    }

    /// The outstanding request, if the engine is waiting on a frame.
    pub fn pending(&self) -> Option<TickHandle> {
        match self.state.pending.load(Ordering::SeqCst) {
            0 => None,
            raw => Some(TickHandle(raw - 1)),
        }
    }

    /// Consume the outstanding request, as a host does when the frame fires.
    ///
    /// Returns the handle to deliver, or `None` when nothing was requested.
    pub fn take_pending(&self) -> Option<TickHandle> {
        match self.state.pending.swap(0, Ordering::SeqCst) {
            0 => None,
            raw => Some(TickHandle(raw - 1)),
        }
    }
}

impl Scheduler for ManualScheduler {
    fn request_tick(&mut self) -> TickHandle {
        let handle = TickHandle(self.state.next_handle.fetch_add(1, Ordering::SeqCst));
        self.state.requested.fetch_add(1, Ordering::SeqCst);
        self.state.pending.store(handle.0 + 1, Ordering::SeqCst);
        handle
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        self.state.cancelled.fetch_add(1, Ordering::SeqCst);
        let _ = self.state.pending.compare_exchange(
            handle.0 + 1,
            0,
            Ordering::SeqCst,
            Ordering::SeqCst,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_scheduler_records_requests() {
        let scheduler = ManualScheduler::new();
        let mut host_side = scheduler.clone();

        assert_eq!(scheduler.requested(), 0);
        assert!(scheduler.pending().is_none());

        let first = host_side.request_tick();
        assert_eq!(scheduler.requested(), 1);
        assert_eq!(scheduler.pending(), Some(first));

        assert_eq!(scheduler.take_pending(), Some(first));
        assert!(scheduler.take_pending().is_none());

        let second = host_side.request_tick();
        assert_ne!(first, second);
        host_side.cancel_tick(second);
        assert_eq!(scheduler.cancelled(), 1);
        assert!(scheduler.pending().is_none());
    }
}
