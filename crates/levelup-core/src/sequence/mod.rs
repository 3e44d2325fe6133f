//! Animation sequencer.
//!
//! Plays the feedback for discrete game events (level-up, quest completion,
//! XP gain, achievement unlock, rank-up) as an ordered list of steps against
//! an injected [`Stage`].

pub mod board;
pub mod capability;
pub mod kind;
pub mod runner;
pub mod step;

pub use board::{Badge, DisplayBoard, FloatingLabel, TargetDisplay};
pub use capability::{AudioPlayer, ModalPresenter, Mute, ProgressSink, Stage};
pub use kind::{Rank, SequenceKind, SequenceTag, ACHIEVEMENT_MODAL};
pub use runner::{Sequencer, SequencerBuilder, TriggerOutcome};
pub use step::{Cue, Flag, Step, VisualChange};
