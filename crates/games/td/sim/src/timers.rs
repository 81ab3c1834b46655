use crate::config::EnemyKind;
use sim_core::Tick;
use std::collections::BTreeMap;

/// Delayed work keyed on the simulation clock.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerEvent {
    StartWave(u32),
    /// Fires once per spawn point.
    Spawn { wave: u32, kind: EnemyKind },
}

/// Logical timer queue. Entries due on the same clock tick fire in the order
/// they were scheduled. There is no per-entry cancellation, only [`clear`].
///
/// [`clear`]: TimerQueue::clear
#[derive(Clone, Debug)]
pub struct TimerQueue<T> {
    entries: BTreeMap<Tick, Vec<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, at: Tick, item: T) {
        self.entries.entry(at).or_default().push(item);
    }

    /// Removes and returns everything due at or before `now`, earliest first.
    pub fn drain_due(&mut self, now: Tick) -> Vec<T> {
        let later = self.entries.split_off(&(now + 1));
        let due = std::mem::replace(&mut self.entries, later);
        due.into_values().flatten().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
