//! Easing functions for animation timing.
//!
//! Each kind maps linear progress in `[0, 1]` to eased progress in `[0, 1]`:
//! - `linear`: identity
//! - `ease-in`: `p²`
//! - `ease-out`: `√p`
//! - `ease-in-out`: `2p²` up to the midpoint, then `1 - 2(1-p)²`
//!
//! # Usage
//!
//! ```
//! use domfx_animation::easing::EasingKind;
//!
//! let ease = EasingKind::EaseIn;
//! assert_eq!(ease.evaluate(0.5), 0.25);
//!
//! let parsed: EasingKind = "ease-out".parse().unwrap();
//! assert_eq!(parsed, EasingKind::EaseOut);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Easing curve applied to raw progress before it reaches an update callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EasingKind {
    /// No easing.
    Linear,
    /// Slow start, accelerating.
    EaseIn,
    /// Fast start, decelerating.
    EaseOut,
    /// Slow start and end, fast middle.
    #[default]
    EaseInOut,
}

impl EasingKind {
    /// All easing kinds, in declaration order.
    pub const ALL: [EasingKind; 4] = [
        EasingKind::Linear,
        EasingKind::EaseIn,
        EasingKind::EaseOut,
        EasingKind::EaseInOut,
    ];

    /// Evaluate the easing function at the given progress.
    ///
    /// Input outside `[0, 1]` is clamped first, so the result is always in
    /// `[0, 1]` with `evaluate(0) == 0` and `evaluate(1) == 1`.
    pub fn evaluate(self, p: f64) -> f64 {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };

        match self {
            Self::Linear => p,
            Self::EaseIn => p * p,
            Self::EaseOut => p.sqrt(),
            Self::EaseInOut => {
                if p <= 0.5 {
                    2.0 * p * p
                } else {
                    let q = 1.0 - p;
                    1.0 - 2.0 * q * q
                }
            }
        }
    }

    /// The kebab-case name used in options and configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseIn => "ease-in",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
        }
    }
}

impl fmt::Display for EasingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when parsing an unknown easing name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown easing kind: {0:?}")]
pub struct UnknownEasing(pub String);

impl FromStr for EasingKind {
    type Err = UnknownEasing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EasingKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownEasing(s.to_string()))
    }
}

/// Free-function form of [`EasingKind::evaluate`].
#[inline]
pub fn ease(kind: EasingKind, p: f64) -> f64 {
    kind.evaluate(p)
}
