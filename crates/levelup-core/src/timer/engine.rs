//! Buff timer engine.
//!
//! The engine is a tick-counted state machine. It does not read the wall
//! clock - every delivered tick decrements each active buff by exactly one
//! second, however late the tick arrived.
//!
//! ## State Transitions
//!
//! ```text
//! Active -> Expiring -> Removed
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(1);
//! engine.register_timer("haste", 90)?;
//! // Once per clock tick:
//! for event in engine.tick() { /* TimerExpired / TimerRemoved */ }
//! ```

use chrono::Utc;

use super::entry::TimerEntry;
use super::registry::TimerRegistry;
use crate::error::TimerError;
use crate::events::{BuffView, Event, RemovalReason};

/// Ticks an expired buff stays addressable before it is dropped.
pub const DEFAULT_FADE_TICKS: u32 = 1;

/// Core buff engine. Sole writer of the [`TimerRegistry`].
#[derive(Debug, Clone)]
pub struct TimerEngine {
    registry: TimerRegistry,
    fade_ticks: u32,
    ticks: u64,
}

impl TimerEngine {
    pub fn new(fade_ticks: u32) -> Self {
        Self {
            registry: TimerRegistry::new(),
            fade_ticks: fade_ticks.max(1),
            ticks: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn registry(&self) -> &TimerRegistry {
        &self.registry
    }

    pub fn get(&self, id: &str) -> Option<&TimerEntry> {
        self.registry.get(id)
    }

    /// Number of ticks processed so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn fade_ticks(&self) -> u32 {
        self.fade_ticks
    }

    /// Remaining time of a buff as `m:ss`.
    pub fn display_string(&self, id: &str) -> Result<String, TimerError> {
        self.registry
            .get(id)
            .map(TimerEntry::display)
            .ok_or_else(|| TimerError::NotFound(id.to_string()))
    }

    pub fn snapshot(&self) -> Event {
        Event::BuffSnapshot {
            tick: self.ticks,
            buffs: self.registry.iter().map(BuffView::from).collect(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a countdown of `initial_secs` seconds.
    ///
    /// Non-positive durations and ids still in the registry are rejected
    /// before anything is mutated.
    pub fn register_timer(
        &mut self,
        id: impl Into<String>,
        initial_secs: i64,
    ) -> Result<TimerEntry, TimerError> {
        let id = id.into();
        if initial_secs <= 0 {
            return Err(TimerError::invalid(
                &id,
                format!("initial seconds must be positive, got {initial_secs}"),
            ));
        }
        let entry = TimerEntry::active(id, initial_secs.unsigned_abs());
        self.registry.insert(entry.clone())?;
        tracing::debug!(id = entry.id(), secs = entry.remaining_secs(), "buff registered");
        Ok(entry)
    }

    /// Drop a buff from any state. Unknown ids are ignored.
    pub fn unregister_timer(&mut self, id: &str) -> Option<Event> {
        let entry = self.registry.remove(id)?;
        tracing::debug!(id = entry.id(), "buff unregistered");
        Some(Event::TimerRemoved {
            id: entry.id().to_string(),
            reason: RemovalReason::Unregistered,
            at: Utc::now(),
        })
    }

    /// Advance every buff by one tick.
    ///
    /// The whole registry is updated before any event is built, so the
    /// returned batch always describes a fully applied tick. Expiries come
    /// first, in registry order, followed by removals of buffs whose fade
    /// window ran out.
    pub fn tick(&mut self) -> Vec<Event> {
        self.ticks += 1;
        let fade_ticks = self.fade_ticks;
        let mut expired = Vec::new();
        let mut faded = Vec::new();

        for entry in self.registry.iter_mut() {
            if entry.is_active() {
                if entry.count_down(fade_ticks) {
                    expired.push(entry.id().to_string());
                }
            } else if entry.fade() {
                faded.push(entry.id().to_string());
            }
        }
        for id in &faded {
            self.registry.remove(id);
        }

        if !expired.is_empty() || !faded.is_empty() {
            tracing::debug!(
                tick = self.ticks,
                expired = expired.len(),
                faded = faded.len(),
                "buff tick"
            );
        }

        let at = Utc::now();
        let tick = self.ticks;
        expired
            .into_iter()
            .map(|id| Event::TimerExpired { id, tick, at })
            .chain(faded.into_iter().map(|id| Event::TimerRemoved {
                id,
                reason: RemovalReason::Faded,
                at,
            }))
            .collect()
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new(DEFAULT_FADE_TICKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::BuffState;
    use proptest::prelude::*;

    fn expired_ids(events: &[Event]) -> Vec<&str> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::TimerExpired { id, .. } => Some(id.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn register_tick_expire_fade() {
        let mut engine = TimerEngine::default();
        engine.register_timer("haste", 2).unwrap();

        assert!(engine.tick().is_empty());
        assert_eq!(engine.display_string("haste").unwrap(), "0:01");

        let events = engine.tick();
        assert_eq!(expired_ids(&events), ["haste"]);
        assert_eq!(engine.get("haste").unwrap().state(), BuffState::Expiring);
        assert_eq!(engine.display_string("haste").unwrap(), "0:00");

        let events = engine.tick();
        assert!(matches!(
            events.as_slice(),
            [Event::TimerRemoved { reason: RemovalReason::Faded, .. }]
        ));
        assert!(engine.get("haste").is_none());
        assert_eq!(
            engine.display_string("haste"),
            Err(TimerError::NotFound("haste".into()))
        );
    }

    #[test]
    fn longer_fade_window_keeps_entry_addressable() {
        let mut engine = TimerEngine::new(3);
        engine.register_timer("shield", 1).unwrap();
        engine.tick();
        engine.tick();
        engine.tick();
        assert_eq!(engine.get("shield").unwrap().state(), BuffState::Expiring);
        assert_eq!(engine.tick().len(), 1);
        assert!(engine.registry().is_empty());
    }

    #[test]
    fn unregister_is_idempotent() {
        let mut engine = TimerEngine::default();
        engine.register_timer("haste", 10).unwrap();
        assert!(engine.unregister_timer("haste").is_some());
        assert!(engine.unregister_timer("haste").is_none());
        assert!(engine.unregister_timer("never-registered").is_none());
        assert!(engine.registry().is_empty());
    }

    #[test]
    fn unregister_while_expiring() {
        let mut engine = TimerEngine::new(5);
        engine.register_timer("haste", 1).unwrap();
        engine.tick();
        assert!(engine.unregister_timer("haste").is_some());
        assert!(engine.tick().is_empty());
    }

    #[test]
    fn expiring_id_cannot_be_reregistered() {
        let mut engine = TimerEngine::default();
        engine.register_timer("haste", 1).unwrap();
        engine.tick();
        let err = engine.register_timer("haste", 30).unwrap_err();
        assert!(matches!(err, TimerError::InvalidTimerState { .. }));
        assert_eq!(engine.get("haste").unwrap().state(), BuffState::Expiring);
    }

    #[test]
    fn both_timers_expire_in_the_same_tick() {
        let mut engine = TimerEngine::default();
        engine.register_timer("a", 1).unwrap();
        engine.register_timer("b", 1).unwrap();

        let events = engine.tick();
        assert_eq!(expired_ids(&events), ["a", "b"]);
        assert!(engine
            .registry()
            .iter()
            .all(|e| e.remaining_secs() == 0 && e.state() == BuffState::Expiring));
    }

    #[test]
    fn snapshot_lists_buffs_in_order() {
        let mut engine = TimerEngine::default();
        engine.register_timer("shield", 125).unwrap();
        engine.register_timer("haste", 59).unwrap();
        match engine.snapshot() {
            Event::BuffSnapshot { tick, buffs, .. } => {
                assert_eq!(tick, 0);
                assert_eq!(buffs[0].display, "2:05");
                assert_eq!(buffs[1].display, "0:59");
            }
            other => panic!("Expected BuffSnapshot, got {other:?}"),
        }
    }

    proptest! {
        #[test]
        fn expires_exactly_on_the_nth_tick(n in 1i64..400) {
            let mut engine = TimerEngine::default();
            engine.register_timer("buff", n).unwrap();
            let mut expiries = Vec::new();
            for tick in 1..=n {
                if !expired_ids(&engine.tick()).is_empty() {
                    expiries.push(tick);
                }
            }
            prop_assert_eq!(expiries, vec![n]);
            let entry = engine.get("buff").unwrap();
            prop_assert_eq!(entry.remaining_secs(), 0);
            prop_assert_eq!(entry.state(), BuffState::Expiring);
        }

        #[test]
        fn non_positive_durations_are_rejected(n in i64::MIN..=0) {
            let mut engine = TimerEngine::default();
            engine.register_timer("keep", 5).unwrap();
            let err = engine.register_timer("buff", n).unwrap_err();
            prop_assert!(
                matches!(err, TimerError::InvalidTimerState { .. }),
                "unexpected error: {:?}",
                err
            );
            prop_assert_eq!(engine.registry().len(), 1);
            prop_assert!(engine.get("buff").is_none());
        }
    }
}
