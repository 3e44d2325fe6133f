use serde::{Deserialize, Serialize};

use super::format::format_time;

/// Lifecycle of a buff countdown.
///
/// ```text
/// Active --(tick, remaining == 1)--> Expiring --(fade window)--> Removed
///   \__________________(unregister)___________________________/^
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuffState {
    Active,
    Expiring,
    Removed,
}

/// One buff countdown held by the registry.
///
/// Fields are only mutated by the engine; adapters read them through the
/// accessors or a [`BuffView`](crate::events::BuffView).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEntry {
    id: String,
    remaining_secs: u64,
    state: BuffState,
    /// Ticks left before an Expiring entry is dropped.
    #[serde(default)]
    fade_ticks_left: u32,
}

impl TimerEntry {
    pub(crate) fn active(id: String, remaining_secs: u64) -> Self {
        debug_assert!(remaining_secs > 0);
        Self {
            id,
            remaining_secs,
            state: BuffState::Active,
            fade_ticks_left: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn state(&self) -> BuffState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == BuffState::Active
    }

    /// `m:ss` rendering of the remaining time.
    pub fn display(&self) -> String {
        format_time(self.remaining_secs)
    }

    /// Advance one tick. Returns `true` when this tick crossed zero.
    pub(crate) fn count_down(&mut self, fade_ticks: u32) -> bool {
        if self.state != BuffState::Active {
            return false;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.state = BuffState::Expiring;
            self.fade_ticks_left = fade_ticks.max(1);
            return true;
        }
        false
    }

    /// Burn one tick of the fade window. Returns `true` once it is used up.
    pub(crate) fn fade(&mut self) -> bool {
        if self.state != BuffState::Expiring {
            return false;
        }
        self.fade_ticks_left = self.fade_ticks_left.saturating_sub(1);
        self.fade_ticks_left == 0
    }

    pub(crate) fn mark_removed(&mut self) {
        self.state = BuffState::Removed;
        self.fade_ticks_left = 0;
    }
}
