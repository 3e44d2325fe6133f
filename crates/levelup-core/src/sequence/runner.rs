//! Sequence runner.
//!
//! `trigger` runs a sequence's leading steps synchronously, up to the first
//! wait. Whatever is left is handed to a spawned task that sleeps through
//! each wait and runs the steps that follow it. A waiting sequence never
//! holds up the caller, other sequences or the buff clock.

use chrono::Utc;
use std::collections::{HashSet, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

use super::capability::{AudioPlayer, ModalPresenter, Mute, ProgressSink, Stage};
use super::kind::{SequenceKind, SequenceTag};
use super::step::Step;
use crate::config::SequenceTimings;
use crate::events::Event;

/// What happened to a trigger. Callers are free to ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Every step ran before `trigger` returned.
    Completed,
    /// Leading steps ran; the rest fire on the runtime.
    Scheduled,
    /// The stage does not render the target. Nothing ran.
    NoTarget,
    /// The same kind is still running on this target. Nothing ran.
    AlreadyRunning,
    /// Leading steps ran but no tokio runtime was available for the rest.
    NoRuntime,
}

type RunKey = (SequenceTag, String);

struct Inner {
    stage: Arc<dyn Stage>,
    audio: Arc<dyn AudioPlayer>,
    modal: Arc<dyn ModalPresenter>,
    progress: Arc<dyn ProgressSink>,
    timings: SequenceTimings,
    events: UnboundedSender<Event>,
    in_flight: Mutex<HashSet<RunKey>>,
}

/// Runs feedback sequences against a [`Stage`]. Cheap to clone.
#[derive(Clone)]
pub struct Sequencer {
    inner: Arc<Inner>,
}

pub struct SequencerBuilder {
    stage: Arc<dyn Stage>,
    audio: Arc<dyn AudioPlayer>,
    modal: Arc<dyn ModalPresenter>,
    progress: Arc<dyn ProgressSink>,
    timings: SequenceTimings,
}

impl SequencerBuilder {
    pub fn audio(mut self, audio: Arc<dyn AudioPlayer>) -> Self {
        self.audio = audio;
        self
    }

    pub fn modal(mut self, modal: Arc<dyn ModalPresenter>) -> Self {
        self.modal = modal;
        self
    }

    pub fn progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    pub fn timings(mut self, timings: SequenceTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Finish the sequencer. Notifications go to `events`.
    pub fn build(self, events: UnboundedSender<Event>) -> Sequencer {
        Sequencer {
            inner: Arc::new(Inner {
                stage: self.stage,
                audio: self.audio,
                modal: self.modal,
                progress: self.progress,
                timings: self.timings,
                events,
                in_flight: Mutex::new(HashSet::new()),
            }),
        }
    }
}

impl Sequencer {
    /// Start building a sequencer for `stage`. Audio, modal and progress
    /// default to [`Mute`].
    pub fn builder(stage: Arc<dyn Stage>) -> SequencerBuilder {
        SequencerBuilder {
            stage,
            audio: Arc::new(Mute),
            modal: Arc::new(Mute),
            progress: Arc::new(Mute),
            timings: SequenceTimings::default(),
        }
    }

    pub fn timings(&self) -> &SequenceTimings {
        &self.inner.timings
    }

    /// Whether a `kind` sequence still has pending steps on `target`.
    pub fn is_running(&self, kind: SequenceTag, target: &str) -> bool {
        self.in_flight().contains(&(kind, target.to_string()))
    }

    /// Fire a sequence at `target`.
    ///
    /// Unknown targets are reported once as `TargetNotFound` and otherwise
    /// ignored. A trigger that overlaps a running sequence of the same kind
    /// on the same target is dropped.
    pub fn trigger(&self, kind: SequenceKind, target: &str) -> TriggerOutcome {
        let tag = kind.tag();
        if !self.inner.stage.contains(target) {
            tracing::debug!(kind = %tag, target_id = target, "sequence target not rendered");
            self.emit(Event::TargetNotFound {
                kind: tag,
                target: target.to_string(),
                at: Utc::now(),
            });
            return TriggerOutcome::NoTarget;
        }
        if !self.in_flight().insert((tag, target.to_string())) {
            tracing::warn!(kind = %tag, target_id = target, "sequence already running, trigger dropped");
            return TriggerOutcome::AlreadyRunning;
        }

        tracing::debug!(kind = %tag, target_id = target, "sequence started");
        let mut run = SequenceRun {
            sequencer: self.clone(),
            kind: tag,
            target: target.to_string(),
            steps: kind.steps(&self.inner.timings).into(),
        };
        let Some(wait) = run.advance() else {
            return TriggerOutcome::Completed;
        };

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(run.drive(wait));
                TriggerOutcome::Scheduled
            }
            Err(_) => {
                tracing::warn!(kind = %tag, target_id = target, "no async runtime, timed steps dropped");
                self.release(tag, target);
                TriggerOutcome::NoRuntime
            }
        }
    }

    fn execute(&self, kind: SequenceTag, target: &str, step: &Step) {
        match step {
            Step::Visual(change) => self.inner.stage.apply(target, change),
            Step::PlayCue(cue) => {
                if let Err(err) = self.inner.audio.play(*cue) {
                    tracing::warn!(kind = %kind, target_id = target, cue = cue.as_str(), error = %err, "audio cue failed");
                }
            }
            Step::ShowModal(modal) => {
                if let Err(err) = self.inner.modal.show(modal, target) {
                    tracing::warn!(kind = %kind, target_id = target, modal = modal.as_str(), error = %err, "modal failed");
                }
            }
            Step::NotifyProgress => self.inner.progress.progress_updated(target),
            Step::Wait(_) => return,
        }
        self.emit(Event::SequenceStep {
            kind,
            target: target.to_string(),
            step: step.name(),
            at: Utc::now(),
        });
    }

    fn finish(&self, kind: SequenceTag, target: &str) {
        self.release(kind, target);
        tracing::debug!(kind = %kind, target_id = target, "sequence completed");
        self.emit(Event::SequenceCompleted {
            kind,
            target: target.to_string(),
            at: Utc::now(),
        });
    }

    fn release(&self, kind: SequenceTag, target: &str) {
        self.in_flight().remove(&(kind, target.to_string()));
    }

    fn emit(&self, event: Event) {
        // A closed channel only means nobody is listening any more.
        let _ = self.inner.events.send(event);
    }

    fn in_flight(&self) -> MutexGuard<'_, HashSet<RunKey>> {
        self.inner.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// One triggered sequence and the steps it has left.
struct SequenceRun {
    sequencer: Sequencer,
    kind: SequenceTag,
    target: String,
    steps: VecDeque<Step>,
}

impl SequenceRun {
    /// Run steps up to the next wait and return its duration. Returns `None`
    /// once the list is exhausted and completion has been reported.
    fn advance(&mut self) -> Option<Duration> {
        while let Some(step) = self.steps.pop_front() {
            if let Step::Wait(wait) = step {
                return Some(wait);
            }
            self.sequencer.execute(self.kind, &self.target, &step);
        }
        self.sequencer.finish(self.kind, &self.target);
        None
    }

    async fn drive(mut self, mut wait: Duration) {
        loop {
            tokio::time::sleep(wait).await;
            match self.advance() {
                Some(next) => wait = next,
                None => break,
            }
        }
    }
}
