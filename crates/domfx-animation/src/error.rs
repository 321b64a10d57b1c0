//! Error types for animation completion handles.

use std::fmt::Debug;
use thiserror::Error;

/// Why an animation's completion handle was rejected.
///
/// Every variant except `Dropped` carries the node the animation ran on, so a
/// caller chaining work per node gets its handle back either way.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnimationError<N: Debug> {
    /// Stopped without finishing. This is ordinary cancellation, not a fault.
    #[error("animation on {0:?} was stopped before completion")]
    Stopped(N),

    /// The update callback panicked and the task was isolated.
    #[error("update callback for {node:?} panicked: {message}")]
    Failed { node: N, message: String },

    /// The engine went away without settling the handle.
    #[error("animation engine dropped before settling")]
    Dropped,
}

impl<N: Debug> AnimationError<N> {
    /// The node the failed animation belonged to.
    pub fn node(&self) -> Option<&N> {
        match self {
            Self::Stopped(node) | Self::Failed { node, .. } => Some(node),
            Self::Dropped => None,
        }
    }

    /// True when the animation was cancelled on purpose.
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_accessor() {
        assert_eq!(AnimationError::Stopped("a").node(), Some(&"a"));
        let failed = AnimationError::Failed {
            node: 7u32,
            message: "boom".to_string(),
        };
        assert_eq!(failed.node(), Some(&7));
        assert!(!failed.is_stopped());
        assert_eq!(AnimationError::<u32>::Dropped.node(), None);
    }

    #[test]
    fn test_display() {
        let err = AnimationError::Stopped("header");
        assert_eq!(
            err.to_string(),
            "animation on \"header\" was stopped before completion"
        );
    }
}
