//! Capabilities the sequencer is handed by the presentation layer.
//!
//! The core only decides *when* these are invoked. What a stage, player or
//! presenter does with the call is up to the implementation.

use super::step::{Cue, VisualChange};
use crate::error::SideEffectError;

/// Renderable targets and their display state.
pub trait Stage: Send + Sync {
    /// Whether `target` is currently rendered.
    fn contains(&self, target: &str) -> bool;

    /// Apply one change to the target. Unknown targets are ignored.
    fn apply(&self, target: &str, change: &VisualChange);
}

pub trait AudioPlayer: Send + Sync {
    fn play(&self, cue: Cue) -> Result<(), SideEffectError>;
}

pub trait ModalPresenter: Send + Sync {
    fn show(&self, modal: &str, target: &str) -> Result<(), SideEffectError>;
}

/// Receives the "progress/XP updated" effect after a quest or achievement.
pub trait ProgressSink: Send + Sync {
    fn progress_updated(&self, target: &str);
}

/// Player that stays silent.
#[derive(Debug, Default, Clone, Copy)]
pub struct Mute;

impl AudioPlayer for Mute {
    fn play(&self, cue: Cue) -> Result<(), SideEffectError> {
        tracing::trace!(cue = cue.as_str(), "audio muted");
        Ok(())
    }
}

impl ModalPresenter for Mute {
    fn show(&self, modal: &str, _target: &str) -> Result<(), SideEffectError> {
        tracing::trace!(modal, "modal suppressed");
        Ok(())
    }
}

impl ProgressSink for Mute {
    fn progress_updated(&self, _target: &str) {}
}
