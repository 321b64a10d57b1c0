//! Core animation types and data structures.
//!
//! This module defines the fundamental types for the animation engine:
//! - `NodeKey`: Bound for the opaque node handles collaborators pass in
//! - `AnimationId`: Unique identifier for a task
//! - `TaskState`: Lifecycle state of a task
//! - `AnimateOptions`: Per-call timing options
//! - `TaskSnapshot`: Read-only view of a queued task

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

use super::easing::EasingKind;

/// Milliseconds on the host's monotonic clock.
pub type Timestamp = f64;

/// Identity of an animated node.
///
/// The engine only hashes and compares node handles; it never inspects them.
pub trait NodeKey: Clone + Eq + Hash + Debug + Send + 'static {}

impl<T> NodeKey for T where T: Clone + Eq + Hash + Debug + Send + 'static {}

/// Unique identifier for an animation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimationId(pub u64);

impl AnimationId {
    /// Generate a new unique animation ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for AnimationId {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle state of an animation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Created but not yet stepped.
    #[default]
    Pending,
    /// Stepped at least once and still in its queue.
    Running,
    /// Aborted before completion; the completion handle was rejected.
    Stopped,
    /// Reached progress 1; the completion handle was resolved.
    Finished,
}

impl TaskState {
    /// True for `Stopped` and `Finished`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Stopped | Self::Finished)
    }
}

/// Options accepted by `Animator::animate`.
///
/// Field names follow the collaborator-facing option object, so a JSON
/// `{"duration": 400, "type": "linear"}` deserializes directly. Missing
/// fields fall back to the engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimateOptions {
    /// Duration in milliseconds. Zero, negative or NaN completes on the first step.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// Easing curve.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub easing: Option<EasingKind>,
    /// Wrap progress instead of completing.
    pub infinite: bool,
}

impl AnimateOptions {
    /// Options with every field left to the engine defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration in milliseconds.
    pub fn duration_ms(mut self, duration: f64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Set the easing curve.
    pub fn easing(mut self, easing: EasingKind) -> Self {
        self.easing = Some(easing);
        self
    }

    /// Make the animation loop until stopped.
    pub fn infinite(mut self) -> Self {
        self.infinite = true;
        self
    }
}

/// Read-only view of a queued task.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub id: AnimationId,
    pub state: TaskState,
    pub start_time: Timestamp,
    pub duration_ms: f64,
    pub easing: EasingKind,
    pub infinite: bool,
    /// Raw progress at the last step (0 before the first).
    pub progress: f64,
}
