//! Step definitions for the sequence runner.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::kind::Rank;

/// Visual flag toggled on a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flag {
    Pulse,
    Glow,
    Unlocked,
    Float,
}

impl Flag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Pulse => "pulse",
            Flag::Glow => "glow",
            Flag::Unlocked => "unlocked",
            Flag::Float => "float",
        }
    }
}

/// Audio cue played by a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    Complete,
    Unlock,
}

impl Cue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Cue::Complete => "complete",
            Cue::Unlock => "unlock",
        }
    }
}

/// A change applied to a target's display state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum VisualChange {
    SetFlag(Flag),
    ClearFlag(Flag),
    /// Attach a floating label to the target.
    ShowLabel(String),
    FadeLabel,
    RemoveLabel,
    /// Replace the badge class list and text in one go. Any flag set before
    /// the swap is dropped along with the old class list.
    SwapRank(Rank),
    /// Progress bar width in percent.
    SetFill(u8),
}

/// One entry of a sequence's ordered step list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Visual(VisualChange),
    /// Fire-and-forget; a failure never stops the sequence.
    PlayCue(Cue),
    /// Fire-and-forget modal request.
    ShowModal(String),
    /// Downstream "progress/XP updated" effect.
    NotifyProgress,
    Wait(Duration),
}

impl Step {
    pub fn wait_ms(ms: u64) -> Self {
        Step::Wait(Duration::from_millis(ms))
    }

    /// Name reported in `SequenceStep` notifications.
    pub fn name(&self) -> String {
        match self {
            Step::Visual(change) => match change {
                VisualChange::SetFlag(flag) => format!("set-flag:{}", flag.as_str()),
                VisualChange::ClearFlag(flag) => format!("clear-flag:{}", flag.as_str()),
                VisualChange::ShowLabel(_) => "show-label".to_string(),
                VisualChange::FadeLabel => "fade-label".to_string(),
                VisualChange::RemoveLabel => "remove-label".to_string(),
                VisualChange::SwapRank(rank) => format!("swap-rank:{rank}"),
                VisualChange::SetFill(pct) => format!("set-fill:{pct}"),
            },
            Step::PlayCue(cue) => format!("play-cue:{}", cue.as_str()),
            Step::ShowModal(modal) => format!("show-modal:{modal}"),
            Step::NotifyProgress => "notify-progress".to_string(),
            Step::Wait(d) => format!("wait:{}ms", d.as_millis()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_names() {
        assert_eq!(Step::Visual(VisualChange::SetFlag(Flag::Pulse)).name(), "set-flag:pulse");
        assert_eq!(Step::PlayCue(Cue::Unlock).name(), "play-cue:unlock");
        assert_eq!(Step::wait_ms(2000).name(), "wait:2000ms");
        assert_eq!(
            Step::Visual(VisualChange::SwapRank(Rank::new("S"))).name(),
            "swap-rank:S"
        );
    }

    #[test]
    fn visual_change_serializes_adjacently_tagged() {
        let json = serde_json::to_value(VisualChange::SetFlag(Flag::Glow)).unwrap();
        assert_eq!(json["type"], "set-flag");
        assert_eq!(json["value"], "glow");
    }
}
