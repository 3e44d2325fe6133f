//! Dashboard driver.
//!
//! A single task owns the [`TimerEngine`] and interleaves clock ticks with
//! adapter commands. Each tick or command runs to completion before the next
//! is picked up, so the registry never needs a lock and observers never see a
//! half-applied tick.
//!
//! ```ignore
//! let (events_tx, mut events) = mpsc::unbounded_channel();
//! let sequencer = Sequencer::builder(stage).build(events_tx.clone());
//! let (dashboard, handle) = Dashboard::from_config(&config, sequencer, events_tx);
//! tokio::spawn(dashboard.run());
//! handle.register_timer("haste", 90).await?;
//! ```

use tokio::sync::{mpsc, oneshot};

use crate::clock::Clock;
use crate::config::Config;
use crate::error::{CoreError, Result, TimerError};
use crate::events::Event;
use crate::sequence::{SequenceKind, Sequencer, TriggerOutcome};
use crate::timer::{TimerEngine, TimerEntry};

enum Command {
    Register {
        id: String,
        initial_secs: i64,
        reply: oneshot::Sender<Result<TimerEntry, TimerError>>,
    },
    Unregister {
        id: String,
    },
    Display {
        id: String,
        reply: oneshot::Sender<Result<String, TimerError>>,
    },
    Snapshot {
        reply: oneshot::Sender<Event>,
    },
}

pub struct Dashboard {
    engine: TimerEngine,
    clock: Clock,
    commands: mpsc::UnboundedReceiver<Command>,
    events: mpsc::UnboundedSender<Event>,
}

/// Adapter-side entry point. Clones share the same dashboard.
#[derive(Clone)]
pub struct DashboardHandle {
    commands: mpsc::UnboundedSender<Command>,
    sequencer: Sequencer,
}

impl Dashboard {
    pub fn new(
        engine: TimerEngine,
        clock: Clock,
        sequencer: Sequencer,
        events: mpsc::UnboundedSender<Event>,
    ) -> (Self, DashboardHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let dashboard = Self {
            engine,
            clock,
            commands: rx,
            events,
        };
        let handle = DashboardHandle {
            commands: tx,
            sequencer,
        };
        (dashboard, handle)
    }

    /// Build engine and clock from `config`. Must be called inside a tokio
    /// runtime.
    pub fn from_config(
        config: &Config,
        sequencer: Sequencer,
        events: mpsc::UnboundedSender<Event>,
    ) -> (Self, DashboardHandle) {
        Self::new(
            TimerEngine::new(config.buffs.fade_ticks),
            Clock::new(config.clock.period()),
            sequencer,
            events,
        )
    }

    /// Drive the dashboard until every handle has been dropped.
    pub async fn run(mut self) {
        tracing::info!(period_ms = self.clock.period().as_millis() as u64, "dashboard running");
        loop {
            // Ticks win ties so a command never observes a tick that was
            // already due but not yet applied.
            tokio::select! {
                biased;
                tick = self.clock.tick() => {
                    let events = self.engine.tick();
                    tracing::trace!(tick = tick.0, engine_tick = self.engine.ticks(), "tick delivered");
                    for event in events {
                        self.emit(event);
                    }
                }
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
            }
        }
        tracing::info!(ticks = self.engine.ticks(), "dashboard stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Register {
                id,
                initial_secs,
                reply,
            } => {
                let result = self.engine.register_timer(id, initial_secs);
                match &result {
                    Ok(entry) => self.emit(Event::timer_registered(entry)),
                    Err(err) => tracing::warn!(error = %err, "buff registration rejected"),
                }
                let _ = reply.send(result);
            }
            Command::Unregister { id } => {
                if let Some(event) = self.engine.unregister_timer(&id) {
                    self.emit(event);
                }
            }
            Command::Display { id, reply } => {
                let _ = reply.send(self.engine.display_string(&id));
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.engine.snapshot());
            }
        }
    }

    fn emit(&self, event: Event) {
        let _ = self.events.send(event);
    }
}

impl DashboardHandle {
    pub async fn register_timer(
        &self,
        id: impl Into<String>,
        initial_secs: i64,
    ) -> Result<TimerEntry> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Register {
            id: id.into(),
            initial_secs,
            reply,
        })?;
        Ok(rx.await.map_err(|_| CoreError::DriverStopped)??)
    }

    /// Remove a buff. Unknown ids and a stopped driver are ignored.
    pub fn unregister_timer(&self, id: impl Into<String>) {
        let _ = self.send(Command::Unregister { id: id.into() });
    }

    /// `m:ss` for a registered buff, or `TimerError::NotFound`.
    pub async fn display_string(&self, id: impl Into<String>) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Display {
            id: id.into(),
            reply,
        })?;
        Ok(rx.await.map_err(|_| CoreError::DriverStopped)??)
    }

    pub async fn snapshot(&self) -> Result<Event> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Snapshot { reply })?;
        rx.await.map_err(|_| CoreError::DriverStopped)
    }

    /// Fire a sequence. Never blocks and never fails.
    pub fn trigger(&self, kind: SequenceKind, target: &str) -> TriggerOutcome {
        self.sequencer.trigger(kind, target)
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    fn send(&self, command: Command) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| CoreError::DriverStopped)
    }
}
