//! Animation lifecycle events.
//!
//! The animator records an event when a task is started, finished, stopped,
//! or isolated after a callback panic. Hosts poll them after each tick:
//!
//! ```ignore
//! animator.tick(frame);
//! for event in animator.drain_events() {
//!     match event {
//!         AnimationEvent::Finished { node, .. } => remove_busy_class(&node),
//!         AnimationEvent::Failed { node, message, .. } => report(&node, &message),
//!         _ => {}
//!     }
//! }
//! ```

use serde::Serialize;
use std::collections::VecDeque;

use super::types::{AnimationId, Timestamp};

/// Event emitted when a task changes lifecycle state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnimationEvent<N> {
    /// Task was queued.
    Started {
        animation_id: AnimationId,
        node: N,
        at: Timestamp,
    },
    /// Task reached progress 1, naturally or through a finishing stop.
    Finished {
        animation_id: AnimationId,
        node: N,
        at: Timestamp,
    },
    /// Task was stopped without finishing.
    Stopped {
        animation_id: AnimationId,
        node: N,
        at: Timestamp,
    },
    /// The update callback panicked; only this task was removed.
    Failed {
        animation_id: AnimationId,
        node: N,
        at: Timestamp,
        message: String,
    },
}

impl<N> AnimationEvent<N> {
    /// Get the node for this event.
    pub fn node(&self) -> &N {
        match self {
            Self::Started { node, .. }
            | Self::Finished { node, .. }
            | Self::Stopped { node, .. }
            | Self::Failed { node, .. } => node,
        }
    }

    /// Get the animation ID for this event.
    pub fn animation_id(&self) -> AnimationId {
        match self {
            Self::Started { animation_id, .. }
            | Self::Finished { animation_id, .. }
            | Self::Stopped { animation_id, .. }
            | Self::Failed { animation_id, .. } => *animation_id,
        }
    }

    /// Check if this event ends a task's life.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Started { .. })
    }
}

/// Bounded FIFO of lifecycle events.
///
/// When full, the oldest event is discarded. A capacity of 0 records nothing.
#[derive(Debug, Clone)]
pub struct EventQueue<N> {
    events: VecDeque<AnimationEvent<N>>,
    capacity: usize,
    dropped: u64,
}

impl<N> EventQueue<N> {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity.min(64)),
            capacity,
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: AnimationEvent<N>) {
        if self.capacity == 0 {
            return;
        }
        if self.events.len() == self.capacity {
            self.events.pop_front();
            self.dropped += 1;
            tracing::trace!(dropped = self.dropped, "animation event queue full, dropping oldest");
        }
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<AnimationEvent<N>> {
        self.events.pop_front()
    }

    pub fn peek(&self) -> Option<&AnimationEvent<N>> {
        self.events.front()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = AnimationEvent<N>> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of events discarded because the queue was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl<N: PartialEq> EventQueue<N> {
    /// Pending events for one node, oldest first.
    pub fn events_for_node(&self, node: &N) -> Vec<&AnimationEvent<N>> {
        self.events.iter().filter(|e| e.node() == node).collect()
    }
}
