use clap::Subcommand;
use levelup_core::{format_time, Config, Dashboard, DisplayBoard, Event, Sequencer};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

#[derive(Subcommand)]
pub enum BuffsAction {
    /// Print seconds as m:ss
    Format {
        seconds: u64,
    },
    /// Count buffs down until every one has expired and faded
    Run {
        /// Buff to register, as ID=SECONDS (repeatable)
        #[arg(long = "buff", value_parser = parse_buff, required = true)]
        buffs: Vec<(String, i64)>,
        /// Override the clock period in milliseconds
        #[arg(long)]
        interval_ms: Option<u64>,
    },
}

fn parse_buff(raw: &str) -> Result<(String, i64), String> {
    let (id, secs) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=SECONDS, got '{raw}'"))?;
    if id.is_empty() {
        return Err(format!("missing buff id in '{raw}'"));
    }
    let secs = secs
        .trim()
        .parse::<i64>()
        .map_err(|e| format!("invalid seconds in '{raw}': {e}"))?;
    Ok((id.to_string(), secs))
}

pub fn run(action: BuffsAction, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        BuffsAction::Format { seconds } => {
            println!("{}", format_time(seconds));
            Ok(())
        }
        BuffsAction::Run { buffs, interval_ms } => {
            let mut config = super::load_config(config_path)?;
            if let Some(ms) = interval_ms {
                config.clock.tick_interval_ms = ms;
            }
            super::runtime()?.block_on(count_down(config, buffs))
        }
    }
}

async fn count_down(
    config: Config,
    buffs: Vec<(String, i64)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, mut events) = mpsc::unbounded_channel();
    let sequencer = Sequencer::builder(Arc::new(DisplayBoard::new()))
        .timings(config.sequences.clone())
        .build(tx.clone());
    let (dashboard, handle) = Dashboard::from_config(&config, sequencer, tx);
    let driver = tokio::spawn(dashboard.run());

    for (id, secs) in &buffs {
        handle.register_timer(id.as_str(), *secs).await?;
    }

    let mut pending = buffs.len();
    while pending > 0 {
        let Some(event) = events.recv().await else {
            break;
        };
        super::print_event(&event)?;
        if matches!(event, Event::TimerRemoved { .. }) {
            pending -= 1;
        }
    }

    let snapshot = handle.snapshot().await?;
    println!("{}", serde_json::to_string_pretty(&snapshot)?);

    drop(handle);
    driver.await?;
    Ok(())
}
