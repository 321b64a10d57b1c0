//! Completion handles returned by `Animator::animate`.
//!
//! A [`Completion`] stays with the task; the matching [`AnimationHandle`] goes
//! to the caller. Settling consumes the `Completion`, so a handle can only
//! ever observe one outcome.

use futures::channel::oneshot;
use futures::ready;
use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use super::error::AnimationError;
use super::types::AnimationId;

/// Outcome delivered to an [`AnimationHandle`].
pub type AnimationResult<N> = Result<N, AnimationError<N>>;

/// Engine-side settle half.
#[derive(Debug)]
pub(crate) struct Completion<N: Debug> {
    tx: oneshot::Sender<AnimationResult<N>>,
}

impl<N: Debug> Completion<N> {
    pub(crate) fn resolve(self, node: N) {
        // The caller may have dropped its handle; nobody is waiting then.
        let _ = self.tx.send(Ok(node));
    }

    pub(crate) fn reject(self, error: AnimationError<N>) {
        let _ = self.tx.send(Err(error));
    }
}

/// Create a linked settle half and caller handle.
pub(crate) fn completion<N: Debug>(id: AnimationId) -> (Completion<N>, AnimationHandle<N>) {
    let (tx, rx) = oneshot::channel();
    (
        Completion { tx },
        AnimationHandle {
            id,
            rx,
            outcome: None,
        },
    )
}

/// Future resolving to the animated node when its animation ends.
///
/// Resolves with `Ok(node)` when the animation finishes (naturally or through
/// `stop_animations(node, true)`) and with `Err(AnimationError::Stopped(node))`
/// when it is stopped without finishing. Dropping the handle does not affect
/// the animation.
#[derive(Debug)]
pub struct AnimationHandle<N: Debug> {
    id: AnimationId,
    rx: oneshot::Receiver<AnimationResult<N>>,
    outcome: Option<AnimationResult<N>>,
}

// No structural pinning: the receiver is re-pinned with `Pin::new` on each poll.
impl<N: Debug> Unpin for AnimationHandle<N> {}

impl<N: Debug> AnimationHandle<N> {
    /// The task this handle belongs to.
    pub fn id(&self) -> AnimationId {
        self.id
    }

    /// Check for an outcome without an executor.
    ///
    /// Returns `None` while the animation is still queued. Once settled the
    /// outcome is kept, so repeated calls see the same value, including after
    /// the handle has been polled to completion.
    pub fn try_outcome(&mut self) -> Option<&AnimationResult<N>> {
        if self.outcome.is_none() {
            self.outcome = match self.rx.try_recv() {
                Ok(Some(outcome)) => Some(outcome),
                Ok(None) => None,
                Err(oneshot::Canceled) => Some(Err(AnimationError::Dropped)),
            };
        }
        self.outcome.as_ref()
    }

    /// True once the animation has finished or been stopped.
    pub fn is_settled(&mut self) -> bool {
        self.try_outcome().is_some()
    }
}

impl<N: Clone + Debug> Future for AnimationHandle<N> {
    type Output = AnimationResult<N>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if let Some(outcome) = &this.outcome {
            return Poll::Ready(outcome.clone());
        }
        let outcome = match ready!(Pin::new(&mut this.rx).poll(cx)) {
            Ok(outcome) => outcome,
            Err(oneshot::Canceled) => Err(AnimationError::Dropped),
        };
        // The receiver is spent now; later checks read the cache.
        this.outcome = Some(outcome.clone());
        Poll::Ready(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    #[test]
    fn test_resolve() {
        let (completion, mut handle) = completion::<&str>(AnimationId(1));
        assert!(handle.try_outcome().is_none());

        completion.resolve("node");
        assert_eq!(handle.try_outcome(), Some(&Ok("node")));
        // Repeated checks keep the outcome
        assert!(handle.is_settled());
        assert_eq!(handle.now_or_never(), Some(Ok("node")));
    }

    #[test]
    fn test_outcome_kept_after_polling_by_reference() {
        let (completion, mut handle) = completion::<&str>(AnimationId(5));
        completion.resolve("node");

        assert_eq!((&mut handle).now_or_never(), Some(Ok("node")));
        assert_eq!(handle.try_outcome(), Some(&Ok("node")));
        assert!(handle.is_settled());
        assert_eq!(handle.now_or_never(), Some(Ok("node")));
    }

    #[test]
    fn test_pending_poll_then_resolve() {
        let (completion, mut handle) = completion::<u8>(AnimationId(6));
        assert_eq!((&mut handle).now_or_never(), None);

        completion.reject(AnimationError::Stopped(9));
        assert_eq!(
            futures::executor::block_on(&mut handle),
            Err(AnimationError::Stopped(9))
        );
        assert_eq!(handle.try_outcome(), Some(&Err(AnimationError::Stopped(9))));
    }

    #[test]
    fn test_reject() {
        let (completion, handle) = completion::<&str>(AnimationId(2));
        completion.reject(AnimationError::Stopped("node"));
        assert_eq!(
            futures::executor::block_on(handle),
            Err(AnimationError::Stopped("node"))
        );
    }

    #[test]
    fn test_dropped_completion() {
        let (completion, mut handle) = completion::<u8>(AnimationId(3));
        drop(completion);
        assert_eq!(handle.try_outcome(), Some(&Err(AnimationError::Dropped)));
    }

    #[test]
    fn test_settle_after_handle_dropped() {
        let (completion, handle) = completion::<u8>(AnimationId(4));
        drop(handle);
        completion.resolve(1);
    }
}
