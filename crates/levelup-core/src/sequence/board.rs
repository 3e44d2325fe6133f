//! In-memory stage.
//!
//! `DisplayBoard` keeps the display state of every registered target so a
//! headless adapter (the CLI, tests) can inspect what a sequence did.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::capability::Stage;
use super::step::{Flag, VisualChange};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloatingLabel {
    pub text: String,
    pub fading: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub class_name: String,
    pub text: String,
}

/// Display state of one target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetDisplay {
    pub flags: BTreeSet<Flag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<Badge>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<FloatingLabel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_pct: Option<u8>,
}

impl TargetDisplay {
    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    fn apply(&mut self, change: &VisualChange) {
        match change {
            VisualChange::SetFlag(flag) => {
                self.flags.insert(*flag);
            }
            VisualChange::ClearFlag(flag) => {
                self.flags.remove(flag);
            }
            VisualChange::ShowLabel(text) => {
                self.label = Some(FloatingLabel {
                    text: text.clone(),
                    fading: false,
                });
            }
            VisualChange::FadeLabel => {
                if let Some(label) = self.label.as_mut() {
                    label.fading = true;
                }
            }
            VisualChange::RemoveLabel => self.label = None,
            VisualChange::SwapRank(rank) => {
                self.flags.clear();
                self.badge = Some(Badge {
                    class_name: rank.class_name(),
                    text: rank.label(),
                });
            }
            VisualChange::SetFill(pct) => self.fill_pct = Some(*pct),
        }
    }
}

#[derive(Debug, Default)]
pub struct DisplayBoard {
    targets: Mutex<IndexMap<String, TargetDisplay>>,
}

impl DisplayBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board that renders each of `ids` with an empty display state.
    pub fn with_targets<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let board = Self::new();
        for id in ids {
            board.add_target(id);
        }
        board
    }

    /// Start rendering `id`. Existing display state is kept.
    pub fn add_target(&self, id: impl Into<String>) {
        self.lock().entry(id.into()).or_default();
    }

    pub fn remove_target(&self, id: &str) -> Option<TargetDisplay> {
        self.lock().shift_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<TargetDisplay> {
        self.lock().get(id).cloned()
    }

    pub fn snapshot(&self) -> IndexMap<String, TargetDisplay> {
        self.lock().clone()
    }

    fn lock(&self) -> MutexGuard<'_, IndexMap<String, TargetDisplay>> {
        self.targets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Stage for DisplayBoard {
    fn contains(&self, target: &str) -> bool {
        self.lock().contains_key(target)
    }

    fn apply(&self, target: &str, change: &VisualChange) {
        if let Some(display) = self.lock().get_mut(target) {
            display.apply(change);
        }
    }
}
