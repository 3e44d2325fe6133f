use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::sequence::SequenceTag;
use crate::timer::{BuffState, TimerEntry};

/// Every notification the core hands to the presentation layer is an Event.
/// The adapter drains them from the dashboard's event channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerRegistered {
        id: String,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Buff crossed zero on this tick. Emitted exactly once per buff.
    TimerExpired {
        id: String,
        tick: u64,
        at: DateTime<Utc>,
    },
    /// Buff left the registry, either after its fade window or on request.
    TimerRemoved {
        id: String,
        reason: RemovalReason,
        at: DateTime<Utc>,
    },
    SequenceStep {
        kind: SequenceTag,
        target: String,
        step: String,
        at: DateTime<Utc>,
    },
    SequenceCompleted {
        kind: SequenceTag,
        target: String,
        at: DateTime<Utc>,
    },
    /// Trigger named a target the stage does not render.
    TargetNotFound {
        kind: SequenceTag,
        target: String,
        at: DateTime<Utc>,
    },
    BuffSnapshot {
        tick: u64,
        buffs: Vec<BuffView>,
        at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalReason {
    Faded,
    Unregistered,
}

/// Read-only view of one buff as the adapter renders it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuffView {
    pub id: String,
    pub state: BuffState,
    pub remaining_secs: u64,
    pub display: String,
}

impl From<&TimerEntry> for BuffView {
    fn from(entry: &TimerEntry) -> Self {
        Self {
            id: entry.id().to_string(),
            state: entry.state(),
            remaining_secs: entry.remaining_secs(),
            display: entry.display(),
        }
    }
}

impl Event {
    pub fn timer_registered(entry: &TimerEntry) -> Self {
        Event::TimerRegistered {
            id: entry.id().to_string(),
            remaining_secs: entry.remaining_secs(),
            at: Utc::now(),
        }
    }

    /// Short name of the variant, handy for logs and assertions.
    pub fn name(&self) -> &'static str {
        match self {
            Event::TimerRegistered { .. } => "timer-registered",
            Event::TimerExpired { .. } => "timer-expired",
            Event::TimerRemoved { .. } => "timer-removed",
            Event::SequenceStep { .. } => "sequence-step",
            Event::SequenceCompleted { .. } => "sequence-completed",
            Event::TargetNotFound { .. } => "target-not-found",
            Event::BuffSnapshot { .. } => "buff-snapshot",
        }
    }
}
