//! Integration tests for the feedback sequences.

mod support;

use std::sync::Arc;
use std::time::Duration;

use levelup_core::sequence::{Badge, FloatingLabel, Flag};
use levelup_core::{Event, Rank, SequenceKind, SequenceTag, Sequencer, TriggerOutcome};
use support::{
    drain, until_completed, FakeAudio, FakeModal, FakeProgress, Journal, RecordingStage,
};
use tokio::sync::mpsc;
use tokio::time::{sleep, Instant};

struct Harness {
    journal: Journal,
    stage: Arc<RecordingStage>,
    sequencer: Sequencer,
    events: mpsc::UnboundedReceiver<Event>,
}

fn harness(targets: &[&str], audio_works: bool) -> Harness {
    let journal = Journal::default();
    let stage = Arc::new(RecordingStage::new(&journal, targets));
    let audio = if audio_works {
        FakeAudio::working(&journal)
    } else {
        FakeAudio::broken(&journal)
    };
    let (tx, events) = mpsc::unbounded_channel();
    let sequencer = Sequencer::builder(stage.clone())
        .audio(Arc::new(audio))
        .modal(Arc::new(FakeModal::working(&journal)))
        .progress(Arc::new(FakeProgress::new(&journal)))
        .build(tx);
    Harness {
        journal,
        stage,
        sequencer,
        events,
    }
}

#[test]
fn quest_completion_runs_glow_sound_progress_in_order() {
    let mut h = harness(&["q1"], true);

    let outcome = h.sequencer.trigger(SequenceKind::QuestComplete, "q1");
    assert_eq!(outcome, TriggerOutcome::Completed);
    assert_eq!(
        h.journal.entries(),
        [
            r#"stage:q1:{"type":"set-flag","value":"glow"}"#,
            "audio:complete",
            "progress:q1",
        ]
    );

    let steps: Vec<String> = drain(&mut h.events)
        .into_iter()
        .filter_map(|e| match e {
            Event::SequenceStep { step, .. } => Some(step),
            _ => None,
        })
        .collect();
    assert_eq!(steps, ["set-flag:glow", "play-cue:complete", "notify-progress"]);
}

#[test]
fn quest_completion_survives_a_failing_sound() {
    let mut h = harness(&["q1"], false);

    let outcome = h.sequencer.trigger(SequenceKind::QuestComplete, "q1");
    assert_eq!(outcome, TriggerOutcome::Completed);
    assert_eq!(
        h.journal.entries(),
        [
            r#"stage:q1:{"type":"set-flag","value":"glow"}"#,
            "audio:complete",
            "progress:q1",
        ]
    );
    // Glow persists after the sequence ends.
    assert!(h.stage.board.get("q1").unwrap().has_flag(Flag::Glow));
    assert!(matches!(
        drain(&mut h.events).last(),
        Some(Event::SequenceCompleted {
            kind: SequenceTag::QuestComplete,
            ..
        })
    ));
}

#[test]
fn achievement_unlock_sets_flags_then_sound_then_modal() {
    let h = harness(&["achievement-7"], true);

    h.sequencer.trigger(SequenceKind::AchievementUnlock, "achievement-7");
    assert_eq!(
        h.journal.entries(),
        [
            r#"stage:achievement-7:{"type":"set-flag","value":"unlocked"}"#,
            r#"stage:achievement-7:{"type":"set-flag","value":"float"}"#,
            "audio:unlock",
            "modal:achievementModal:achievement-7",
        ]
    );
    let display = h.stage.board.get("achievement-7").unwrap();
    assert!(display.has_flag(Flag::Unlocked));
    assert!(display.has_flag(Flag::Float));
}

#[test]
fn achievement_unlock_survives_a_failing_modal() {
    let journal = Journal::default();
    let stage = Arc::new(RecordingStage::new(&journal, &["a1"]));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let sequencer = Sequencer::builder(stage.clone())
        .audio(Arc::new(FakeAudio::broken(&journal)))
        .modal(Arc::new(FakeModal::broken(&journal)))
        .build(tx);

    assert_eq!(
        sequencer.trigger(SequenceKind::AchievementUnlock, "a1"),
        TriggerOutcome::Completed
    );
    assert!(matches!(
        drain(&mut rx).last(),
        Some(Event::SequenceCompleted { .. })
    ));
}

#[test]
fn missing_target_does_no_work() {
    let mut h = harness(&["q1"], true);

    let outcome = h.sequencer.trigger(SequenceKind::QuestComplete, "q404");
    assert_eq!(outcome, TriggerOutcome::NoTarget);
    assert!(h.journal.entries().is_empty());

    let events = drain(&mut h.events);
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        Event::TargetNotFound { target, .. } if target == "q404"
    ));
}

#[tokio::test(start_paused = true)]
async fn rank_up_swaps_badge_exactly_one_second_later() {
    let mut h = harness(&["player"], true);
    let start = Instant::now();

    let outcome = h.sequencer.trigger(
        SequenceKind::RankUp {
            rank: Rank::new("S"),
        },
        "player",
    );
    assert_eq!(outcome, TriggerOutcome::Scheduled);

    let display = h.stage.board.get("player").unwrap();
    assert!(display.has_flag(Flag::Pulse));
    assert!(display.badge.is_none());

    sleep(Duration::from_millis(999)).await;
    assert!(h.stage.board.get("player").unwrap().badge.is_none());

    until_completed(&mut h.events).await;
    assert_eq!(start.elapsed(), Duration::from_millis(1000));

    let display = h.stage.board.get("player").unwrap();
    assert!(!display.has_flag(Flag::Pulse));
    assert_eq!(
        display.badge,
        Some(Badge {
            class_name: "rank rank-s".into(),
            text: "S-Rank".into(),
        })
    );
}

#[tokio::test(start_paused = true)]
async fn xp_gain_label_fades_then_disappears() {
    let mut h = harness(&["player"], true);
    let start = Instant::now();

    h.sequencer
        .trigger(SequenceKind::XpGain { amount: 50 }, "player");
    let label = |h: &Harness| h.stage.board.get("player").unwrap().label;

    assert_eq!(
        label(&h),
        Some(FloatingLabel {
            text: "+50 XP".into(),
            fading: false,
        })
    );

    sleep(Duration::from_millis(1999)).await;
    assert_eq!(label(&h).map(|l| l.fading), Some(false));

    sleep(Duration::from_millis(2)).await;
    assert_eq!(label(&h).map(|l| l.fading), Some(true));

    sleep(Duration::from_millis(997)).await;
    assert!(label(&h).is_some());

    until_completed(&mut h.events).await;
    assert_eq!(start.elapsed(), Duration::from_millis(3000));
    assert!(label(&h).is_none());
}

#[tokio::test(start_paused = true)]
async fn level_up_pulse_holds_two_seconds() {
    let mut h = harness(&["level-badge"], true);
    let start = Instant::now();

    h.sequencer.trigger(SequenceKind::LevelUp, "level-badge");
    assert!(h.stage.board.get("level-badge").unwrap().has_flag(Flag::Pulse));

    until_completed(&mut h.events).await;
    assert_eq!(start.elapsed(), Duration::from_millis(2000));
    assert!(!h.stage.board.get("level-badge").unwrap().has_flag(Flag::Pulse));
}

#[tokio::test(start_paused = true)]
async fn progress_fill_restores_width_after_delay() {
    let mut h = harness(&["xp-bar"], true);

    h.sequencer
        .trigger(SequenceKind::ProgressFill { percent: 65 }, "xp-bar");
    assert_eq!(h.stage.board.get("xp-bar").unwrap().fill_pct, Some(0));

    until_completed(&mut h.events).await;
    assert_eq!(h.stage.board.get("xp-bar").unwrap().fill_pct, Some(65));
}

#[tokio::test(start_paused = true)]
async fn waiting_sequences_do_not_block_each_other() {
    let mut h = harness(&["player", "level-badge"], true);
    let start = Instant::now();

    h.sequencer.trigger(SequenceKind::LevelUp, "level-badge");
    h.sequencer.trigger(
        SequenceKind::RankUp {
            rank: Rank::new("A"),
        },
        "player",
    );

    let first = until_completed(&mut h.events).await;
    assert!(matches!(
        first.last(),
        Some(Event::SequenceCompleted {
            kind: SequenceTag::RankUp,
            ..
        })
    ));
    assert_eq!(start.elapsed(), Duration::from_millis(1000));
    // Level-up is still holding its pulse.
    assert!(h.stage.board.get("level-badge").unwrap().has_flag(Flag::Pulse));

    until_completed(&mut h.events).await;
    assert_eq!(start.elapsed(), Duration::from_millis(2000));
}
