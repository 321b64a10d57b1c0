//! The animation engine entry point.
//!
//! An [`Animator`] owns one session's registry of per-node queues, the frame
//! driver that paces them, and the lifecycle event queue. Collaborators only
//! ever see `animate`, `stop_animations` and the query helpers; the host wires
//! its frame callback to [`Animator::on_tick`].
//!
//! # Usage
//!
//! ```
//! use domfx_animation::{AnimateOptions, Animator, EasingKind, ManualClock, ManualScheduler};
//!
//! let clock = ManualClock::new();
//! let scheduler = ManualScheduler::new();
//! let mut animator = Animator::new(clock.clone(), scheduler.clone());
//!
//! let mut handle = animator.animate(
//!     "banner",
//!     |_node: &&'static str, progress: f64, _options: &AnimateOptions| {
//!         // write opacity = progress to the element here
//!         let _ = progress;
//!     },
//!     AnimateOptions::new().duration_ms(200.0).easing(EasingKind::Linear),
//! );
//!
//! // Host frame loop
//! while let Some(frame) = scheduler.take_pending() {
//!     clock.advance(16.0);
//!     animator.tick(frame);
//! }
//! assert_eq!(handle.try_outcome(), Some(&Ok("banner")));
//! ```

use std::panic;

use domfx_config::AnimationConfig;

use super::clock::Clock;
use super::completion::AnimationHandle;
use super::driver::FrameDriver;
use super::easing::EasingKind;
use super::events::{AnimationEvent, EventQueue};
use super::registry::AnimationRegistry;
use super::scheduler::{Scheduler, TickHandle};
use super::task::{AnimationTask, PanicPayload, StepOutcome, TaskTiming};
use super::types::{AnimateOptions, AnimationId, NodeKey, TaskSnapshot, Timestamp};

/// Engine-wide fallbacks resolved once from configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AnimationDefaults {
    duration_ms: f64,
    easing: EasingKind,
    isolate_callback_panics: bool,
}

impl AnimationDefaults {
    fn from_config(config: &AnimationConfig) -> Self {
        let easing = config.default_easing.parse().unwrap_or_else(|err| {
            tracing::warn!(%err, "invalid default easing in config, using ease-in-out");
            EasingKind::default()
        });
        Self {
            duration_ms: config.default_duration_ms,
            easing,
            isolate_callback_panics: config.isolate_callback_panics,
        }
    }
}

/// Frame-driven animation engine for one document session.
pub struct Animator<N: NodeKey> {
    clock: Box<dyn Clock>,
    driver: FrameDriver,
    registry: AnimationRegistry<N>,
    events: EventQueue<N>,
    defaults: AnimationDefaults,
}

impl<N: NodeKey> Animator<N> {
    /// Create an animator with the default configuration.
    pub fn new<C, S>(clock: C, scheduler: S) -> Self
    where
        C: Clock + 'static,
        S: Scheduler + 'static,
    {
        Self::with_config(clock, scheduler, &AnimationConfig::default())
    }

    /// Create an animator using the given configuration section.
    pub fn with_config<C, S>(clock: C, scheduler: S, config: &AnimationConfig) -> Self
    where
        C: Clock + 'static,
        S: Scheduler + 'static,
    {
        Self {
            clock: Box::new(clock),
            driver: FrameDriver::new(Box::new(scheduler)),
            registry: AnimationRegistry::new(),
            events: EventQueue::with_capacity(config.event_capacity),
            defaults: AnimationDefaults::from_config(config),
        }
    }

    /// Current time on the engine clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Queue an animation on `node`.
    ///
    /// `update` is called once per frame with the eased progress until the
    /// animation finishes or is stopped. The first call happens on the next
    /// frame, never synchronously. The returned handle can be awaited or
    /// polled with [`AnimationHandle::try_outcome`]; dropping it does not
    /// cancel the animation.
    pub fn animate<F>(&mut self, node: N, update: F, options: AnimateOptions) -> AnimationHandle<N>
    where
        F: FnMut(&N, f64, &AnimateOptions) + Send + 'static,
    {
        let start_time = self.clock.now();
        let timing = TaskTiming {
            start_time,
            duration_ms: options.duration.unwrap_or(self.defaults.duration_ms),
            easing: options.easing.unwrap_or(self.defaults.easing),
            infinite: options.infinite,
        };
        let (task, handle) = AnimationTask::new(node.clone(), timing, options, Box::new(update));

        tracing::debug!(
            node = ?node,
            id = ?task.id,
            duration_ms = timing.duration_ms,
            easing = %timing.easing,
            infinite = timing.infinite,
            "animation queued"
        );
        self.events.push(AnimationEvent::Started {
            animation_id: task.id,
            node,
            at: start_time,
        });

        self.registry.enqueue(task);
        self.driver.ensure_running();
        handle
    }

    /// Stop whatever `node` is running, then queue a new animation.
    ///
    /// `finish` decides how the replaced animations end, as in
    /// [`Animator::stop_animations`].
    pub fn animate_replacing<F>(
        &mut self,
        node: N,
        update: F,
        options: AnimateOptions,
        finish: bool,
    ) -> AnimationHandle<N>
    where
        F: FnMut(&N, f64, &AnimateOptions) + Send + 'static,
    {
        self.stop_animations(&node, finish);
        self.animate(node, update, options)
    }

    /// Settle every animation on `node` right now.
    ///
    /// With `finish`, each task's callback receives progress 1 and its handle
    /// resolves. Without it, handles reject with
    /// [`AnimationError::Stopped`](crate::AnimationError::Stopped) and no
    /// further callback runs. Unknown nodes are ignored.
    pub fn stop_animations(&mut self, node: &N, finish: bool) {
        let Some(mut queue) = self.registry.take(node) else {
            return;
        };
        let now = self.clock.now();
        tracing::debug!(node = ?node, finish, count = queue.len(), "stopping animations");

        let mut propagate = None;
        for task in queue.iter_mut() {
            let outcome = task.force(finish);
            if let Some(payload) = self.record_settled(task.id, task.node().clone(), outcome, now) {
                propagate.get_or_insert(payload);
            }
        }
        drop(queue);

        if let Some(payload) = propagate {
            panic::resume_unwind(payload);
        }
    }

    /// Host frame callback for the request identified by `frame`.
    ///
    /// Steps every queued task with `now`, drops the ones that settled and
    /// requests another frame only if work remains. A frame that is not the
    /// one currently requested (delivered while idle, or withdrawn by `clear`
    /// on a host that cannot cancel) is ignored.
    pub fn on_tick(&mut self, frame: TickHandle, now: Timestamp) {
        if !self.driver.begin_tick(frame) {
            tracing::trace!(?frame, now, "ignoring stale frame");
            return;
        }

        let settled = self.registry.step_all(now);
        let mut propagate = None;
        for entry in settled {
            if let Some(payload) = self.record_settled(entry.id, entry.node, entry.outcome, now) {
                propagate.get_or_insert(payload);
            }
        }

        self.driver.end_tick(!self.registry.is_empty());

        if let Some(payload) = propagate {
            panic::resume_unwind(payload);
        }
    }

    /// [`Animator::on_tick`] at the engine clock's current time.
    pub fn tick(&mut self, frame: TickHandle) {
        let now = self.clock.now();
        self.on_tick(frame, now);
    }

    /// Stop everything and withdraw the pending frame (session teardown).
    ///
    /// Every outstanding handle rejects. Lifecycle events already recorded,
    /// plus the `Stopped` events produced here, remain available.
    pub fn clear(&mut self) {
        self.driver.shutdown();
        let now = self.clock.now();
        let nodes = self.registry.node_count();
        let mut tasks = self.registry.drain();
        if !tasks.is_empty() {
            tracing::debug!(count = tasks.len(), nodes, "clearing animations");
        }
        for task in tasks.iter_mut() {
            let outcome = task.force(false);
            self.record_settled(task.id, task.node().clone(), outcome, now);
        }
    }

    /// True while `node` has queued animations.
    pub fn is_animating(&self, node: &N) -> bool {
        self.registry.contains(node)
    }

    /// Read-only view of `node`'s queue, in execution order.
    pub fn snapshot(&self, node: &N) -> Vec<TaskSnapshot> {
        self.registry.tasks_for(node)
    }

    /// Number of queued animations across all nodes.
    pub fn active_count(&self) -> usize {
        self.registry.len()
    }

    pub fn has_active_animations(&self) -> bool {
        !self.registry.is_empty()
    }

    // ========================================================================
    // Event Methods
    // ========================================================================

    /// Drain all pending lifecycle events, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = AnimationEvent<N>> + '_ {
        self.events.drain()
    }

    /// Pop a single event from the queue.
    pub fn pop_event(&mut self) -> Option<AnimationEvent<N>> {
        self.events.pop()
    }

    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    /// Get all pending events for a specific node (without removing them).
    pub fn events_for_node(&self, node: &N) -> Vec<&AnimationEvent<N>> {
        self.events.events_for_node(node)
    }

    /// Record a task that left its queue. Returns the panic payload when a
    /// callback panic must propagate to the host.
    fn record_settled(
        &mut self,
        animation_id: AnimationId,
        node: N,
        outcome: StepOutcome,
        at: Timestamp,
    ) -> Option<PanicPayload> {
        match outcome {
            StepOutcome::Continue => None,
            StepOutcome::Finished => {
                tracing::trace!(node = ?node, id = ?animation_id, "animation finished");
                self.events.push(AnimationEvent::Finished {
                    animation_id,
                    node,
                    at,
                });
                None
            }
            StepOutcome::Stopped => {
                tracing::trace!(node = ?node, id = ?animation_id, "animation stopped");
                self.events.push(AnimationEvent::Stopped {
                    animation_id,
                    node,
                    at,
                });
                None
            }
            StepOutcome::Failed { message, payload } => {
                tracing::error!(
                    node = ?node,
                    id = ?animation_id,
                    %message,
                    "animation update callback panicked"
                );
                self.events.push(AnimationEvent::Failed {
                    animation_id,
                    node,
                    at,
                    message,
                });
                if self.defaults.isolate_callback_panics {
                    None
                } else {
                    Some(payload)
                }
            }
        }
    }
}

impl<N: NodeKey> Drop for Animator<N> {
    fn drop(&mut self) {
        // Queued tasks reject their own handles when dropped.
        self.driver.shutdown();
    }
}

static_assertions::assert_impl_all!(Animator<u64>: Send);
