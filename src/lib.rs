//! domfx: DOM convenience layer, animation engine surface.
//!
//! Re-exports the animation engine and configuration crates and wires them
//! together for a document session.

use std::path::Path;

use anyhow::{Context, Result};

pub use domfx_animation as animation;
pub use domfx_config as config;

pub use domfx_animation::{
    AnimateOptions, AnimationError, AnimationEvent, AnimationHandle, Animator, Clock, EasingKind,
    NodeKey, Scheduler, SystemClock,
};
pub use domfx_config::DomfxConfig;

/// Load configuration for a session.
///
/// With an explicit path the file must exist and parse; without one,
/// `domfx.toml` in the current directory is used if present. Environment
/// overrides apply in both cases.
pub fn load_config(path: Option<&Path>) -> Result<DomfxConfig> {
    let mut config = match path {
        Some(path) => DomfxConfig::load_from_file(path)
            .with_context(|| format!("loading domfx config from {}", path.display()))?,
        None => DomfxConfig::load_or_default(),
    };
    config.merge_with_env();
    Ok(config)
}

/// Create the animator for one document session.
pub fn session_animator<N, S>(scheduler: S, config: &DomfxConfig) -> Animator<N>
where
    N: NodeKey,
    S: Scheduler + 'static,
{
    Animator::with_config(SystemClock::new(), scheduler, &config.animation)
}
