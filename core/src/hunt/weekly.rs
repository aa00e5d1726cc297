//! Weekly hunt marks
//!
//! Each weekly mark is a single elite bill that moves through
//! `Unobtained -> Obtained -> Killed`. The game exposes only whether the bill
//! is held and the kill counter of its one target, so the state is inferred
//! from those two values on every update.

use serde::{Deserialize, Serialize};

use super::{TrackedMarkConfig, reconcile};
use crate::providers::{CounterProvider, WeeklyMarkRecord};

/// Progress of one weekly mark within the current reset period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeeklyHuntState {
    #[default]
    Unobtained,
    Obtained,
    Killed,
}

impl WeeklyHuntState {
    /// Apply at most one transition for the given snapshot.
    ///
    /// Rules are tried in order and the first match wins; in `Obtained` the
    /// kill check runs before the abandon check. `Killed` only leaves via
    /// an explicit reset.
    pub fn advance(self, record: WeeklyMarkRecord) -> Self {
        match self {
            Self::Unobtained if record.obtained => Self::Obtained,
            Self::Obtained if record.first_kill_count == 1 => Self::Killed,
            Self::Obtained if !record.obtained && record.first_kill_count != 1 => Self::Unobtained,
            state => state,
        }
    }

    /// Manual correction: step to the next state, wrapping `Killed` back
    /// to `Unobtained`.
    pub fn cycled(self) -> Self {
        match self {
            Self::Unobtained => Self::Obtained,
            Self::Obtained => Self::Killed,
            Self::Killed => Self::Unobtained,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unobtained => "Mark Available",
            Self::Obtained => "Mark Obtained",
            Self::Killed => "Mark Killed",
        }
    }
}

/// Tracked state for one weekly mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyMark {
    pub hunt_id: u32,
    state: WeeklyHuntState,
}

impl WeeklyMark {
    pub fn new(hunt_id: u32) -> Self {
        Self {
            hunt_id,
            state: WeeklyHuntState::Unobtained,
        }
    }

    pub fn state(&self) -> WeeklyHuntState {
        self.state
    }

    pub fn is_killed(&self) -> bool {
        self.state == WeeklyHuntState::Killed
    }

    /// Returns true if the state changed.
    pub fn update(&mut self, counters: &(impl CounterProvider + ?Sized)) -> bool {
        let Some(record) = counters.weekly_mark(self.hunt_id) else {
            return false;
        };
        let next = self.state.advance(record);
        let changed = next != self.state;
        self.state = next;
        changed
    }
}

/// All weekly marks of one task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyHuntTracker {
    marks: Vec<WeeklyMark>,
}

impl WeeklyHuntTracker {
    pub fn for_config(configured: &[TrackedMarkConfig]) -> Self {
        let mut tracker = Self::default();
        tracker.sync(configured);
        tracker
    }

    /// Align the mark list with the configured ids, keeping existing states.
    pub fn sync(&mut self, configured: &[TrackedMarkConfig]) {
        reconcile(&mut self.marks, configured, |m| m.hunt_id, WeeklyMark::new);
    }

    pub fn marks(&self) -> &[WeeklyMark] {
        &self.marks
    }

    pub fn get(&self, hunt_id: u32) -> Option<&WeeklyMark> {
        self.marks.iter().find(|m| m.hunt_id == hunt_id)
    }

    /// Returns true if any mark changed state.
    pub fn update(&mut self, counters: &(impl CounterProvider + ?Sized)) -> bool {
        let mut changed = false;
        for mark in &mut self.marks {
            changed |= mark.update(counters);
        }
        changed
    }

    pub fn reset(&mut self) {
        for mark in &mut self.marks {
            mark.state = WeeklyHuntState::Unobtained;
        }
    }

    /// Step one mark to its next state. Returns the new state, or `None` if
    /// the mark is not part of this tracker.
    pub fn force_next_state(&mut self, hunt_id: u32) -> Option<WeeklyHuntState> {
        let mark = self.marks.iter_mut().find(|m| m.hunt_id == hunt_id)?;
        mark.state = mark.state.cycled();
        Some(mark.state)
    }

    /// Tracked marks that have not been killed yet.
    pub fn incomplete_count(&self, configured: &[TrackedMarkConfig]) -> usize {
        configured
            .iter()
            .filter(|c| c.tracked)
            .filter(|c| !self.get(c.id).is_some_and(WeeklyMark::is_killed))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::CounterSnapshot;

    fn record(obtained: bool, first_kill_count: u32) -> WeeklyMarkRecord {
        WeeklyMarkRecord {
            obtained,
            first_kill_count,
        }
    }

    #[test]
    fn obtaining_then_killing() {
        let state = WeeklyHuntState::Unobtained.advance(record(true, 0));
        assert_eq!(state, WeeklyHuntState::Obtained);

        let state = state.advance(record(true, 1));
        assert_eq!(state, WeeklyHuntState::Killed);
    }

    #[test]
    fn unobtained_stays_without_bill() {
        let state = WeeklyHuntState::Unobtained.advance(record(false, 0));
        assert_eq!(state, WeeklyHuntState::Unobtained);
    }

    #[test]
    fn unobtained_does_not_jump_to_killed() {
        // Only one transition per update
        let state = WeeklyHuntState::Unobtained.advance(record(true, 1));
        assert_eq!(state, WeeklyHuntState::Obtained);
    }

    #[test]
    fn abandoned_bill_returns_to_unobtained() {
        let state = WeeklyHuntState::Obtained.advance(record(false, 0));
        assert_eq!(state, WeeklyHuntState::Unobtained);
    }

    #[test]
    fn kill_check_wins_over_abandon_check() {
        // Bill turned in on the same frame the kill registered
        let state = WeeklyHuntState::Obtained.advance(record(false, 1));
        assert_eq!(state, WeeklyHuntState::Killed);
    }

    #[test]
    fn killed_is_terminal() {
        for snapshot in [record(false, 0), record(true, 0), record(true, 1), record(false, 1)] {
            assert_eq!(WeeklyHuntState::Killed.advance(snapshot), WeeklyHuntState::Killed);
        }
    }

    #[test]
    fn cycling_wraps() {
        let state = WeeklyHuntState::Unobtained.cycled().cycled().cycled();
        assert_eq!(state, WeeklyHuntState::Unobtained);
    }

    #[test]
    fn tracker_updates_from_provider() {
        let configured = vec![TrackedMarkConfig::new(1), TrackedMarkConfig::new(2)];
        let mut tracker = WeeklyHuntTracker::for_config(&configured);
        let mut counters = CounterSnapshot::new();
        counters.set_weekly_mark(1, true, 0);

        assert!(tracker.update(&counters));
        assert_eq!(tracker.get(1).map(WeeklyMark::state), Some(WeeklyHuntState::Obtained));
        // Mark 2 has no data and stays put
        assert_eq!(tracker.get(2).map(WeeklyMark::state), Some(WeeklyHuntState::Unobtained));
        assert!(!tracker.update(&counters));

        counters.set_weekly_mark(1, true, 1);
        assert!(tracker.update(&counters));
        assert_eq!(tracker.incomplete_count(&configured), 1);

        tracker.reset();
        assert_eq!(tracker.incomplete_count(&configured), 2);
    }

    #[test]
    fn untracked_marks_do_not_count() {
        let configured = vec![TrackedMarkConfig::new(1), TrackedMarkConfig::untracked(2)];
        let tracker = WeeklyHuntTracker::for_config(&configured);
        assert_eq!(tracker.incomplete_count(&configured), 1);
    }

    #[test]
    fn sync_keeps_existing_states() {
        let mut tracker = WeeklyHuntTracker::for_config(&[TrackedMarkConfig::new(1)]);
        tracker.force_next_state(1);

        tracker.sync(&[TrackedMarkConfig::new(3), TrackedMarkConfig::new(1)]);
        let ids: Vec<_> = tracker.marks().iter().map(|m| m.hunt_id).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(tracker.get(1).map(WeeklyMark::state), Some(WeeklyHuntState::Obtained));
        assert_eq!(tracker.force_next_state(9), None);
    }
}
