//! Per-node task queues.
//!
//! The registry owns every queued task. A node's entry exists exactly while
//! its queue is non-empty: it is created by the first `enqueue` and removed on
//! the step (or stop) that empties it.

use std::collections::HashMap;

use super::task::{AnimationTask, StepOutcome};
use super::types::{AnimationId, NodeKey, TaskSnapshot, Timestamp};

/// A task that left its queue during `step_all`.
pub(crate) struct Settled<N> {
    pub id: AnimationId,
    pub node: N,
    pub outcome: StepOutcome,
}

pub(crate) struct AnimationRegistry<N: NodeKey> {
    queues: HashMap<N, Vec<AnimationTask<N>>>,
}

impl<N: NodeKey> Default for AnimationRegistry<N> {
    fn default() -> Self {
        Self {
            queues: HashMap::new(),
        }
    }
}

impl<N: NodeKey> AnimationRegistry<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task to its node's queue, creating the queue if needed.
    pub fn enqueue(&mut self, task: AnimationTask<N>) {
        self.queues
            .entry(task.node().clone())
            .or_default()
            .push(task);
    }

    /// Step every task once with the same `now`.
    ///
    /// Tasks within a queue run in insertion order. Tasks that finish, stop or
    /// fail are removed in the same pass and returned; emptied queues are
    /// dropped.
    pub fn step_all(&mut self, now: Timestamp) -> Vec<Settled<N>> {
        let mut settled = Vec::new();

        for queue in self.queues.values_mut() {
            queue.retain_mut(|task| {
                let outcome = task.step(now);
                if outcome.is_done() {
                    settled.push(Settled {
                        id: task.id,
                        node: task.node().clone(),
                        outcome,
                    });
                    false
                } else {
                    true
                }
            });
        }

        self.queues.retain(|_, queue| !queue.is_empty());
        settled
    }

    /// Detach a node's whole queue.
    pub fn take(&mut self, node: &N) -> Option<Vec<AnimationTask<N>>> {
        self.queues.remove(node)
    }

    /// Read-only view of a node's queue, in execution order.
    pub fn tasks_for(&self, node: &N) -> Vec<TaskSnapshot> {
        self.queues
            .get(node)
            .map(|queue| queue.iter().map(AnimationTask::snapshot).collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, node: &N) -> bool {
        self.queues.contains_key(node)
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    /// Total number of queued tasks across all nodes.
    pub fn len(&self) -> usize {
        self.queues.values().map(Vec::len).sum()
    }

    pub fn node_count(&self) -> usize {
        self.queues.len()
    }

    /// Remove every queue, returning the detached tasks.
    pub fn drain(&mut self) -> Vec<AnimationTask<N>> {
        self.queues.drain().flat_map(|(_, queue)| queue).collect()
    }
}
