//! # LevelUp Core Library
//!
//! The timed-state core of the LevelUp dashboard: buff countdowns and the
//! feedback sequences played for level-ups, quests, achievements and rank
//! changes. Rendering is left to a presentation adapter, which talks to the
//! core through registrations, queries, triggers and an event stream.
//!
//! ## Architecture
//!
//! - **Clock**: a 1 Hz tick source with skip-on-miss semantics
//! - **Timer Engine**: a tick-counted state machine per buff
//!   (`Active -> Expiring -> Removed`) over an ordered registry
//! - **Sequencer**: ordered step lists (flag changes, audio cues, waits) run
//!   against an injected stage, with audio and modal as fallible side effects
//! - **Dashboard**: the single task that owns the engine and multiplexes
//!   ticks with adapter commands
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Buff state machine
//! - [`Sequencer`]: Feedback sequence runner
//! - [`Dashboard`]: Driver task and its [`DashboardHandle`]
//! - [`Config`]: Dashboard configuration

pub mod clock;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod events;
pub mod sequence;
pub mod timer;

pub use clock::{Clock, Tick};
pub use config::{Config, SequenceTimings};
pub use dashboard::{Dashboard, DashboardHandle};
pub use error::{ConfigError, CoreError, Result, SideEffectError, TimerError};
pub use events::{BuffView, Event, RemovalReason};
pub use sequence::{
    AudioPlayer, DisplayBoard, ModalPresenter, ProgressSink, Rank, SequenceKind, SequenceTag,
    Sequencer, Stage, TriggerOutcome,
};
pub use timer::{format_time, BuffState, TimerEngine, TimerEntry};
