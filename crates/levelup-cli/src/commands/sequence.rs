use clap::{Subcommand, ValueEnum};
use levelup_core::config::AudioConfig;
use levelup_core::sequence::Cue;
use levelup_core::{
    AudioPlayer, DisplayBoard, Event, ModalPresenter, ProgressSink, Rank, SequenceKind,
    Sequencer, SideEffectError, TriggerOutcome,
};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Clone, Copy, ValueEnum)]
pub enum KindArg {
    LevelUp,
    QuestComplete,
    XpGain,
    AchievementUnlock,
    RankUp,
    ProgressFill,
}

#[derive(Subcommand)]
pub enum SequenceAction {
    /// Play a sequence against a headless board and print what happened
    Play {
        kind: KindArg,
        /// Target id (quest, achievement, badge...)
        target: String,
        /// XP amount for xp-gain
        #[arg(long)]
        amount: Option<u32>,
        /// New rank for rank-up
        #[arg(long)]
        rank: Option<String>,
        /// Fill percent for progress-fill
        #[arg(long)]
        percent: Option<u8>,
    },
    /// Print the step list of a sequence
    Steps {
        kind: KindArg,
        #[arg(long, default_value = "0")]
        amount: u32,
        #[arg(long, default_value = "S")]
        rank: String,
        #[arg(long, default_value = "100")]
        percent: u8,
    },
}

impl KindArg {
    fn into_kind(
        self,
        amount: Option<u32>,
        rank: Option<String>,
        percent: Option<u8>,
    ) -> Result<SequenceKind, String> {
        Ok(match self {
            KindArg::LevelUp => SequenceKind::LevelUp,
            KindArg::QuestComplete => SequenceKind::QuestComplete,
            KindArg::AchievementUnlock => SequenceKind::AchievementUnlock,
            KindArg::XpGain => SequenceKind::XpGain {
                amount: amount.ok_or("xp-gain needs --amount")?,
            },
            KindArg::RankUp => SequenceKind::RankUp {
                rank: Rank::new(rank.ok_or("rank-up needs --rank")?),
            },
            KindArg::ProgressFill => SequenceKind::ProgressFill {
                percent: percent.ok_or("progress-fill needs --percent")?,
            },
        })
    }
}

/// Plays cues by checking the configured asset is present.
struct AssetAudio {
    config: AudioConfig,
}

impl AudioPlayer for AssetAudio {
    fn play(&self, cue: Cue) -> Result<(), SideEffectError> {
        if !self.config.enabled {
            return Ok(());
        }
        let asset = self.config.asset_for(cue);
        if !Path::new(asset).is_file() {
            return Err(SideEffectError::AssetUnavailable(asset.to_string()));
        }
        tracing::info!(cue = cue.as_str(), asset, "playing cue");
        Ok(())
    }
}

struct LogModal;

impl ModalPresenter for LogModal {
    fn show(&self, modal: &str, target: &str) -> Result<(), SideEffectError> {
        tracing::info!(modal, target_id = target, "modal shown");
        Ok(())
    }
}

struct LogProgress;

impl ProgressSink for LogProgress {
    fn progress_updated(&self, target: &str) {
        tracing::info!(target_id = target, "progress updated");
    }
}

pub fn run(action: SequenceAction, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SequenceAction::Play {
            kind,
            target,
            amount,
            rank,
            percent,
        } => {
            let config = super::load_config(config_path)?;
            let kind = kind.into_kind(amount, rank, percent)?;
            super::runtime()?.block_on(play(config, kind, target))
        }
        SequenceAction::Steps {
            kind,
            amount,
            rank,
            percent,
        } => {
            let config = super::load_config_or_default(config_path)?;
            let kind = kind.into_kind(Some(amount), Some(rank), Some(percent))?;
            for step in kind.steps(&config.sequences) {
                println!("{}", step.name());
            }
            Ok(())
        }
    }
}

async fn play(
    config: levelup_core::Config,
    kind: SequenceKind,
    target: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let board = Arc::new(DisplayBoard::with_targets([target.clone()]));
    let (tx, mut events) = mpsc::unbounded_channel();
    let sequencer = Sequencer::builder(board.clone())
        .audio(Arc::new(AssetAudio {
            config: config.audio.clone(),
        }))
        .modal(Arc::new(LogModal))
        .progress(Arc::new(LogProgress))
        .timings(config.sequences.clone())
        .build(tx);

    let outcome = sequencer.trigger(kind, &target);
    tracing::debug!(?outcome, "sequence triggered");
    if outcome != TriggerOutcome::NoTarget {
        while let Some(event) = events.recv().await {
            super::print_event(&event)?;
            if matches!(event, Event::SequenceCompleted { .. }) {
                break;
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&board.snapshot())?);
    Ok(())
}
