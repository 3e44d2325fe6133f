//! Shared fakes for the integration tests.
//!
//! Every fake writes to one journal so a test can assert the exact order in
//! which the sequencer touched the stage, the audio player, the modal
//! presenter and the progress sink.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use levelup_core::sequence::{Cue, VisualChange};
use levelup_core::{
    AudioPlayer, DisplayBoard, Event, ModalPresenter, ProgressSink, SideEffectError, Stage,
};
use tokio::sync::mpsc;

#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// `DisplayBoard` that also journals every change it applies.
pub struct RecordingStage {
    pub board: DisplayBoard,
    journal: Journal,
}

impl RecordingStage {
    pub fn new(journal: &Journal, targets: &[&str]) -> Self {
        Self {
            board: DisplayBoard::with_targets(targets.iter().copied()),
            journal: journal.clone(),
        }
    }
}

impl Stage for RecordingStage {
    fn contains(&self, target: &str) -> bool {
        self.board.contains(target)
    }

    fn apply(&self, target: &str, change: &VisualChange) {
        self.journal.push(format!("stage:{target}:{}", serde_json::to_string(change).unwrap()));
        self.board.apply(target, change);
    }
}

/// Audio player that journals the cue, then fails or succeeds.
pub struct FakeAudio {
    journal: Journal,
    fail: bool,
}

impl FakeAudio {
    pub fn working(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            fail: false,
        }
    }

    pub fn broken(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            fail: true,
        }
    }
}

impl AudioPlayer for FakeAudio {
    fn play(&self, cue: Cue) -> Result<(), SideEffectError> {
        self.journal.push(format!("audio:{}", cue.as_str()));
        if self.fail {
            Err(SideEffectError::PlaybackBlocked("autoplay disabled".into()))
        } else {
            Ok(())
        }
    }
}

pub struct FakeModal {
    journal: Journal,
    fail: bool,
}

impl FakeModal {
    pub fn working(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            fail: false,
        }
    }

    pub fn broken(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            fail: true,
        }
    }
}

impl ModalPresenter for FakeModal {
    fn show(&self, modal: &str, target: &str) -> Result<(), SideEffectError> {
        self.journal.push(format!("modal:{modal}:{target}"));
        if self.fail {
            Err(SideEffectError::ModalUnavailable(modal.to_string()))
        } else {
            Ok(())
        }
    }
}

pub struct FakeProgress {
    journal: Journal,
}

impl FakeProgress {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
        }
    }
}

impl ProgressSink for FakeProgress {
    fn progress_updated(&self, target: &str) {
        self.journal.push(format!("progress:{target}"));
    }
}

/// Drain whatever is queued right now.
pub fn drain(rx: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

/// Receive until the next `SequenceCompleted`, returning everything seen.
pub async fn until_completed(rx: &mut mpsc::UnboundedReceiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        let done = matches!(event, Event::SequenceCompleted { .. });
        events.push(event);
        if done {
            return events;
        }
    }
    panic!("event channel closed before the sequence completed");
}
