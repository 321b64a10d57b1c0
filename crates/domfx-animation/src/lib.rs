//! Frame-driven animation engine for the domfx DOM layer.
//!
//! This crate provides:
//! - **Easing**: the four progress curves animations can use
//! - **Tasks**: per-animation timing and a step state machine
//! - **Registry**: per-node queues of active tasks
//! - **Frame driver**: requests host frames only while work remains
//! - **Completion handles**: futures settled exactly once per animation
//! - **Lifecycle events**: started/finished/stopped/failed notifications
//!
//! # Architecture
//!
//! ```text
//! Animator
//!   ├── Clock            (injected time source)
//!   ├── FrameDriver      ──▶ Scheduler (host per-frame primitive)
//!   ├── AnimationRegistry
//!   │     └── node ──▶ [AnimationTask, ...]  (insertion order)
//!   └── EventQueue
//! ```

mod animator;
pub mod clock;
mod completion;
mod driver;
pub mod easing;
mod error;
pub mod events;
mod registry;
pub mod scheduler;
mod task;
pub mod types;

pub use animator::Animator;
pub use clock::{Clock, ManualClock, SystemClock};
pub use completion::{AnimationHandle, AnimationResult};
pub use easing::{EasingKind, UnknownEasing, ease};
pub use error::AnimationError;
pub use events::{AnimationEvent, EventQueue};
pub use scheduler::{ManualScheduler, Scheduler, TickHandle};
pub use task::UpdateFn;
pub use types::{AnimateOptions, AnimationId, NodeKey, TaskSnapshot, TaskState, Timestamp};

pub use domfx_config::AnimationConfig;
