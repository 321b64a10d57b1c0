//! A single animation task and its step state machine.
//!
//! ```text
//! Pending ──step──▶ Running ──progress 1 / forced finish──▶ Finished (resolved)
//!                      │
//!                      └──forced stop / callback panic──▶ Stopped (rejected)
//! ```
//!
//! A task never inspects the value its update callback produces; the callback
//! runs purely for its side effect on the node.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use super::completion::{AnimationHandle, Completion, completion};
use super::easing::EasingKind;
use super::error::AnimationError;
use super::types::{AnimateOptions, AnimationId, NodeKey, TaskSnapshot, TaskState, Timestamp};

/// Callback invoked with the node, the eased progress, and the caller's options.
pub type UpdateFn<N> = Box<dyn FnMut(&N, f64, &AnimateOptions) + Send>;

/// Payload of a panic caught while running an update callback.
pub(crate) type PanicPayload = Box<dyn Any + Send + 'static>;

/// Timing resolved from `AnimateOptions` and engine defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct TaskTiming {
    pub start_time: Timestamp,
    pub duration_ms: f64,
    pub easing: EasingKind,
    pub infinite: bool,
}

impl TaskTiming {
    /// Raw (pre-easing) progress at `now`.
    ///
    /// Bounded tasks clamp to `[0, 1]`; infinite tasks wrap into `[0, 1)`.
    /// A non-positive or NaN duration is always at 1, for infinite tasks too.
    pub fn raw_progress(&self, now: Timestamp) -> f64 {
        if !(self.duration_ms > 0.0) {
            return 1.0;
        }
        let raw = (now - self.start_time) / self.duration_ms;
        if !raw.is_finite() {
            return if self.infinite { 0.0 } else { 1.0 };
        }
        if self.infinite {
            let wrapped = raw.rem_euclid(1.0);
            // rem_euclid rounds tiny negative inputs up to exactly 1.0
            if wrapped >= 1.0 { 0.0 } else { wrapped }
        } else {
            raw.clamp(0.0, 1.0)
        }
    }
}

/// Result of stepping a task once.
pub(crate) enum StepOutcome {
    /// Still running; keep it queued.
    Continue,
    /// Reached progress 1 and resolved its handle.
    Finished,
    /// Force-stopped and rejected its handle.
    Stopped,
    /// The update callback panicked; the handle was rejected.
    Failed { message: String, payload: PanicPayload },
}

impl StepOutcome {
    pub fn is_done(&self) -> bool {
        !matches!(self, Self::Continue)
    }
}

/// One queued animation on one node.
pub(crate) struct AnimationTask<N: NodeKey> {
    pub id: AnimationId,
    node: N,
    timing: TaskTiming,
    options: AnimateOptions,
    update: UpdateFn<N>,
    state: TaskState,
    progress: f64,
    completion: Option<Completion<N>>,
}

impl<N: NodeKey> AnimationTask<N> {
    /// Create a pending task and the caller's handle for it.
    pub fn new(
        node: N,
        timing: TaskTiming,
        options: AnimateOptions,
        update: UpdateFn<N>,
    ) -> (Self, AnimationHandle<N>) {
        let id = AnimationId::new();
        let (completion, handle) = completion(id);
        let task = Self {
            id,
            node,
            timing,
            options,
            update,
            state: TaskState::Pending,
            progress: 0.0,
            completion: Some(completion),
        };
        (task, handle)
    }

    pub fn node(&self) -> &N {
        &self.node
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            id: self.id,
            state: self.state,
            start_time: self.timing.start_time,
            duration_ms: self.timing.duration_ms,
            easing: self.timing.easing,
            infinite: self.timing.infinite,
            progress: self.progress,
        }
    }

    /// Advance to `now` on the regular frame cadence.
    pub fn step(&mut self, now: Timestamp) -> StepOutcome {
        let raw = self.timing.raw_progress(now);
        self.advance(raw)
    }

    /// Settle immediately, outside the frame cadence.
    ///
    /// With `finish` the callback gets one last call at progress 1 and the
    /// handle resolves; without it the handle rejects and the callback is not
    /// called again.
    pub fn force(&mut self, finish: bool) -> StepOutcome {
        if self.state().is_terminal() {
            return StepOutcome::Stopped;
        }
        if finish {
            self.advance(1.0)
        } else {
            self.state = TaskState::Stopped;
            if let Some(completion) = self.completion.take() {
                completion.reject(AnimationError::Stopped(self.node.clone()));
            }
            StepOutcome::Stopped
        }
    }

    fn advance(&mut self, raw: f64) -> StepOutcome {
        self.state = TaskState::Running;
        self.progress = raw;
        let eased = self.timing.easing.evaluate(raw);

        let update = &mut self.update;
        let node = &self.node;
        let options = &self.options;
        let result = panic::catch_unwind(AssertUnwindSafe(|| (*update)(node, eased, options)));
        if let Err(payload) = result {
            let message = panic_message(&*payload);
            self.state = TaskState::Stopped;
            if let Some(completion) = self.completion.take() {
                completion.reject(AnimationError::Failed {
                    node: self.node.clone(),
                    message: message.clone(),
                });
            }
            return StepOutcome::Failed { message, payload };
        }

        if raw >= 1.0 {
            self.state = TaskState::Finished;
            if let Some(completion) = self.completion.take() {
                completion.resolve(self.node.clone());
            }
            StepOutcome::Finished
        } else {
            StepOutcome::Continue
        }
    }
}

impl<N: NodeKey> Drop for AnimationTask<N> {
    fn drop(&mut self) {
        // Torn down while still queued: the handle must not wait forever.
        if let Some(completion) = self.completion.take() {
            completion.reject(AnimationError::Stopped(self.node.clone()));
        }
    }
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "update callback panicked".to_string()
    }
}
