//! Sequence kinds.
//!
//! A kind names the game event being celebrated and expands into the
//! ordered step list the runner interprets.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::step::{Cue, Flag, Step, VisualChange};
use crate::config::SequenceTimings;

/// Modal shown when an achievement unlocks.
pub const ACHIEVEMENT_MODAL: &str = "achievementModal";

/// Hunter rank such as `"S"` or `"A"`, kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rank(String);

impl Rank {
    pub fn new(rank: impl Into<String>) -> Self {
        Self(rank.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Badge class list, e.g. `rank rank-s`.
    pub fn class_name(&self) -> String {
        format!("rank rank-{}", self.0.to_lowercase())
    }

    /// Badge text, e.g. `S-Rank`.
    pub fn label(&self) -> String {
        format!("{}-Rank", self.0)
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A triggerable sequence together with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SequenceKind {
    LevelUp,
    QuestComplete,
    XpGain { amount: u32 },
    AchievementUnlock,
    RankUp { rank: Rank },
    /// Load-time sweep of a progress bar from empty to `percent`.
    ProgressFill { percent: u8 },
}

/// Payload-free identity of a [`SequenceKind`].
///
/// Two triggers with the same tag and target count as the same sequence,
/// whatever their payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequenceTag {
    LevelUp,
    QuestComplete,
    XpGain,
    AchievementUnlock,
    RankUp,
    ProgressFill,
}

impl SequenceTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            SequenceTag::LevelUp => "level-up",
            SequenceTag::QuestComplete => "quest-complete",
            SequenceTag::XpGain => "xp-gain",
            SequenceTag::AchievementUnlock => "achievement-unlock",
            SequenceTag::RankUp => "rank-up",
            SequenceTag::ProgressFill => "progress-fill",
        }
    }
}

impl fmt::Display for SequenceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl SequenceKind {
    pub fn tag(&self) -> SequenceTag {
        match self {
            SequenceKind::LevelUp => SequenceTag::LevelUp,
            SequenceKind::QuestComplete => SequenceTag::QuestComplete,
            SequenceKind::XpGain { .. } => SequenceTag::XpGain,
            SequenceKind::AchievementUnlock => SequenceTag::AchievementUnlock,
            SequenceKind::RankUp { .. } => SequenceTag::RankUp,
            SequenceKind::ProgressFill { .. } => SequenceTag::ProgressFill,
        }
    }

    /// Expand into the ordered step list.
    pub fn steps(&self, timings: &SequenceTimings) -> Vec<Step> {
        use VisualChange::*;

        match self {
            SequenceKind::LevelUp => vec![
                Step::Visual(SetFlag(Flag::Pulse)),
                Step::wait_ms(timings.level_up_hold_ms),
                Step::Visual(ClearFlag(Flag::Pulse)),
            ],
            SequenceKind::QuestComplete => vec![
                Step::Visual(SetFlag(Flag::Glow)),
                Step::PlayCue(Cue::Complete),
                Step::NotifyProgress,
            ],
            SequenceKind::XpGain { amount } => vec![
                Step::Visual(ShowLabel(format!("+{amount} XP"))),
                Step::wait_ms(timings.xp_hold_ms),
                Step::Visual(FadeLabel),
                Step::wait_ms(timings.xp_fade_ms),
                Step::Visual(RemoveLabel),
            ],
            SequenceKind::AchievementUnlock => vec![
                Step::Visual(SetFlag(Flag::Unlocked)),
                Step::Visual(SetFlag(Flag::Float)),
                Step::PlayCue(Cue::Unlock),
                Step::ShowModal(ACHIEVEMENT_MODAL.to_string()),
            ],
            SequenceKind::RankUp { rank } => vec![
                Step::Visual(SetFlag(Flag::Pulse)),
                Step::wait_ms(timings.rank_up_hold_ms),
                Step::Visual(SwapRank(rank.clone())),
            ],
            SequenceKind::ProgressFill { percent } => vec![
                Step::Visual(SetFill(0)),
                Step::wait_ms(timings.progress_fill_delay_ms),
                Step::Visual(SetFill((*percent).min(100))),
            ],
        }
    }
}
