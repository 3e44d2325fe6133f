//! Buff registry.
//!
//! Entries are addressed by id and iterate in registration order, which is
//! the order expiry notifications go out in.

use indexmap::IndexMap;

use super::entry::TimerEntry;
use crate::error::TimerError;

#[derive(Debug, Clone, Default)]
pub struct TimerRegistry {
    entries: IndexMap<String, TimerEntry>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&TimerEntry> {
        self.entries.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TimerEntry> {
        self.entries.values()
    }

    /// Insert a fresh entry. An id that is still present, active or fading,
    /// is rejected.
    pub(crate) fn insert(&mut self, entry: TimerEntry) -> Result<(), TimerError> {
        if self.entries.contains_key(entry.id()) {
            return Err(TimerError::invalid(entry.id(), "already registered"));
        }
        self.entries.insert(entry.id().to_string(), entry);
        Ok(())
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TimerEntry> {
        self.entries.values_mut()
    }

    /// Drop an entry, handing it back in the `Removed` state.
    pub(crate) fn remove(&mut self, id: &str) -> Option<TimerEntry> {
        let mut entry = self.entries.shift_remove(id)?;
        entry.mark_removed();
        Some(entry)
    }
}
