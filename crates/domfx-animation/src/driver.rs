//! Frame driver: keeps exactly one host frame requested while work remains.

use super::scheduler::{Scheduler, TickHandle};

/// Whether a frame is currently requested from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DriverState {
    Idle,
    Scheduled(TickHandle),
}

pub(crate) struct FrameDriver {
    scheduler: Box<dyn Scheduler>,
    state: DriverState,
}

impl FrameDriver {
    pub fn new(scheduler: Box<dyn Scheduler>) -> Self {
        Self {
            scheduler,
            state: DriverState::Idle,
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self.state, DriverState::Scheduled(_))
    }

    /// Request a frame unless one is already outstanding.
    pub fn ensure_running(&mut self) {
        if self.state == DriverState::Idle {
            let handle = self.scheduler.request_tick();
            tracing::trace!(?handle, "frame driver started");
            self.state = DriverState::Scheduled(handle);
        }
    }

    /// Accept a delivered frame.
    ///
    /// Returns `false` for a stale frame, which the caller must ignore: one
    /// arriving while idle, or one from a request that was since withdrawn
    /// and replaced.
    pub fn begin_tick(&mut self, handle: TickHandle) -> bool {
        match self.state {
            DriverState::Scheduled(current) if current == handle => true,
            DriverState::Scheduled(current) => {
                tracing::trace!(?handle, ?current, "ignoring superseded frame");
                false
            }
            DriverState::Idle => false,
        }
    }

    /// Finish a frame: re-arm while work remains, otherwise go idle.
    pub fn end_tick(&mut self, has_work: bool) {
        if has_work {
            self.state = DriverState::Scheduled(self.scheduler.request_tick());
        } else {
            tracing::trace!("frame driver idle");
            self.state = DriverState::Idle;
        }
    }

    /// Withdraw any outstanding frame and go idle.
    pub fn shutdown(&mut self) {
        if let DriverState::Scheduled(handle) = self.state {
            self.scheduler.cancel_tick(handle);
            self.state = DriverState::Idle;
        }
    }
}
