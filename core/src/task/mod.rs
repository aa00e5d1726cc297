//! Task records
//!
//! A [`TaskRecord`] pairs a task's user configuration with the progress the
//! engine keeps for it:
//!
//! ```text
//!   TaskConfig (user, read-only here)      TaskData (engine-owned)
//!   ├─ id / name / enabled                 ├─ complete
//!   ├─ schedule ──► reset engine           └─ progress (per kind)
//!   └─ kind ──────► which progress shape
//! ```
//!
//! The record never owns a timer. The registry compares `now` with the
//! cached next reset and calls [`TaskRecord::reset`] once per crossing;
//! [`TaskRecord::update`] only re-derives state from live counters.

mod config;
mod data;

pub use config::{DEFAULT_MAX_ALLOWANCES, TaskConfig, TaskKind, TaskKindConfig};
pub use data::{Progress, TaskData};

use dutykeeper_types::TaskCategory;

use crate::compare::TaskStatus;
use crate::hunt::WeeklyHuntState;
use crate::providers::{CounterProvider, HuntReference};
use crate::reset::ResetSchedule;

/// Configuration and progress of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    config: TaskConfig,
    data: TaskData,
}

impl TaskRecord {
    /// Fresh record in its initial, incomplete state.
    pub fn new(config: TaskConfig) -> Self {
        let data = TaskData::new(&config.kind);
        Self { config, data }
    }

    /// Rebuild a record from persisted progress.
    pub fn restore(config: TaskConfig, mut data: TaskData) -> Self {
        if !data.reconcile(&config.kind) {
            tracing::warn!(task = %config.id, "Persisted progress has a different kind; progress rebuilt");
        }
        Self { config, data }
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn config(&self) -> &TaskConfig {
        &self.config
    }

    pub fn data(&self) -> &TaskData {
        &self.data
    }

    pub fn category(&self) -> TaskCategory {
        self.config.category()
    }

    pub fn schedule(&self) -> ResetSchedule {
        self.config.schedule
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Swap in new settings. Progress is kept where the kind still matches;
    /// completion is left for the next update to re-derive.
    pub fn reconfigure(&mut self, config: TaskConfig) {
        self.config = config;
        if !self.data.reconcile(&self.config.kind) {
            tracing::debug!(task = %self.config.id, "Task kind changed; progress cleared");
        }
    }

    /// Re-derive progress and completion from live counters.
    ///
    /// Returns true if the data changed (worth persisting).
    pub fn update(
        &mut self,
        counters: &(impl CounterProvider + ?Sized),
        reference: &(impl HuntReference + ?Sized),
    ) -> bool {
        let was_complete = self.data.is_complete();
        let changed = self.data.update(&self.config.id, &self.config.kind, counters, reference);
        if !was_complete && self.data.is_complete() {
            tracing::info!(task = %self.config.id, "Task complete");
        }
        changed
    }

    /// Clear progress and mark the task incomplete.
    pub fn reset(&mut self) {
        self.data.reset(&self.config.kind);
    }

    pub fn status(&self) -> TaskStatus {
        self.data.status()
    }

    pub fn status_message(&self) -> String {
        self.data.status_message(&self.config.kind)
    }

    /// Manually step a weekly mark to its next state.
    ///
    /// Returns `None` if this is not a weekly hunt task or the mark is not
    /// configured on it.
    pub fn force_next_hunt_state(&mut self, hunt_id: u32) -> Option<WeeklyHuntState> {
        let state = self.data.weekly_hunts_mut()?.force_next_state(hunt_id)?;
        tracing::debug!(task = %self.config.id, hunt = hunt_id, ?state, "Weekly mark state forced");
        Some(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hunt::{HuntReferenceTable, TrackedMarkConfig};
    use crate::providers::{CounterSnapshot, OrderType};
    use dutykeeper_types::ComparisonMode;

    fn threshold_task(mode: ComparisonMode, threshold: i64) -> TaskRecord {
        TaskRecord::new(TaskConfig::new(
            "roulette",
            "Duty Roulette",
            ResetSchedule::Daily,
            TaskKindConfig::Threshold { threshold, mode },
        ))
    }

    fn allowance_task() -> TaskRecord {
        TaskRecord::new(TaskConfig::new(
            "tribal_quests",
            "Tribal Quests",
            ResetSchedule::Daily,
            TaskKindConfig::Allowance {
                threshold: 12,
                mode: ComparisonMode::LessThan,
                max_allowances: 12,
            },
        ))
    }

    fn weekly_hunt_task() -> TaskRecord {
        TaskRecord::new(TaskConfig::new(
            "weekly_marks",
            "Hunt Marks (Weekly)",
            ResetSchedule::Weekly,
            TaskKindConfig::HuntWeekly {
                marks: vec![TrackedMarkConfig::new(1), TrackedMarkConfig::new(2)],
            },
        ))
    }

    #[test]
    fn new_task_is_incomplete() {
        let task = threshold_task(ComparisonMode::LessThan, 5);
        assert_eq!(task.status(), TaskStatus::Incomplete);
        assert_eq!(task.status_message(), "No Data");
    }

    #[test]
    fn missing_counter_stays_incomplete() {
        let mut task = threshold_task(ComparisonMode::LessThanOrEqual, 5);
        let changed = task.update(&CounterSnapshot::new(), &HuntReferenceTable::new());
        assert!(!changed);
        assert_eq!(task.status(), TaskStatus::Incomplete);
    }

    #[test]
    fn threshold_task_completes_from_counter() {
        let mut task = threshold_task(ComparisonMode::LessThan, 5);
        let reference = HuntReferenceTable::new();
        let mut counters = CounterSnapshot::new();

        counters.set_counter("roulette", 5);
        assert!(task.update(&counters, &reference));
        assert_eq!(task.status(), TaskStatus::Incomplete);

        counters.set_counter("roulette", 3);
        assert!(task.update(&counters, &reference));
        assert_eq!(task.status(), TaskStatus::Complete);
        assert_eq!(task.status_message(), "3 Remaining");

        // Same snapshot again: nothing to persist
        assert!(!task.update(&counters, &reference));
    }

    #[test]
    fn counter_dropping_out_keeps_last_value() {
        let mut task = threshold_task(ComparisonMode::EqualTo, 0);
        let reference = HuntReferenceTable::new();
        let mut counters = CounterSnapshot::new();

        counters.set_counter("roulette", 0);
        task.update(&counters, &reference);
        assert!(task.status().is_complete());

        counters.clear_counter("roulette");
        assert!(!task.update(&counters, &reference));
        assert!(task.status().is_complete());
    }

    #[test]
    fn reset_clears_completion() {
        let mut task = threshold_task(ComparisonMode::LessThan, 5);
        let mut counters = CounterSnapshot::new();
        counters.set_counter("roulette", 0);
        task.update(&counters, &HuntReferenceTable::new());
        assert!(task.status().is_complete());

        task.reset();
        assert_eq!(task.status(), TaskStatus::Incomplete);
        assert_eq!(task.data().progress(), &Progress::Threshold { value: None });
    }

    #[test]
    fn allowance_reset_refills_pool() {
        let mut task = allowance_task();
        task.reset();
        assert_eq!(task.status_message(), "12 Allowances Remaining");

        let mut counters = CounterSnapshot::new();
        counters.set_counter("tribal_quests", 9);
        task.update(&counters, &HuntReferenceTable::new());
        assert!(task.status().is_complete());
        assert_eq!(task.status_message(), "9 Allowances Remaining");
    }

    #[test]
    fn weekly_hunt_task_completes_when_all_tracked_killed() {
        let mut task = weekly_hunt_task();
        let reference = HuntReferenceTable::new();
        let mut counters = CounterSnapshot::new();
        assert_eq!(task.status_message(), "2 Hunts Remaining");

        counters.set_weekly_mark(1, true, 0).set_weekly_mark(2, true, 0);
        task.update(&counters, &reference);
        counters.set_weekly_mark(1, true, 1);
        task.update(&counters, &reference);
        assert_eq!(task.status_message(), "1 Hunts Remaining");
        assert_eq!(task.status(), TaskStatus::Incomplete);

        counters.set_weekly_mark(2, false, 1);
        task.update(&counters, &reference);
        assert_eq!(task.status(), TaskStatus::Complete);

        task.reset();
        assert_eq!(task.status(), TaskStatus::Incomplete);
        assert_eq!(task.status_message(), "2 Hunts Remaining");
    }

    #[test]
    fn compound_hunt_task_uses_reference_tables() {
        let mut reference = HuntReferenceTable::new();
        reference.insert_order(6, OrderType::Elite, 40).insert_target(41, &[1]);

        let mut task = TaskRecord::new(TaskConfig::new(
            "elite_marks",
            "Elite Marks",
            ResetSchedule::Daily,
            TaskKindConfig::HuntCompound {
                orders: vec![TrackedMarkConfig::new(6)],
            },
        ));

        let mut counters = CounterSnapshot::new();
        counters.accept_bill(6, 2).set_kill_counts(6, &[1]);
        assert!(task.update(&counters, &reference));
        assert!(task.status().is_complete());
        assert_eq!(task.status_message(), "0 Hunts Remaining");
    }

    #[test]
    fn config_change_does_not_touch_completion() {
        let mut task = weekly_hunt_task();
        let mut config = task.config().clone();
        config.kind = TaskKindConfig::HuntWeekly {
            marks: vec![TrackedMarkConfig::untracked(1), TrackedMarkConfig::untracked(2)],
        };

        task.reconfigure(config);
        assert_eq!(task.status(), TaskStatus::Incomplete);

        task.update(&CounterSnapshot::new(), &HuntReferenceTable::new());
        assert_eq!(task.status(), TaskStatus::Complete);
    }

    #[test]
    fn restore_keeps_matching_progress() {
        let mut original = allowance_task();
        let mut counters = CounterSnapshot::new();
        counters.set_counter("tribal_quests", 4);
        original.update(&counters, &HuntReferenceTable::new());

        let restored = TaskRecord::restore(original.config().clone(), original.data().clone());
        assert_eq!(restored, original);

        // Persisted progress from a different kind is discarded; completion
        // waits for the next update
        let mut restored = TaskRecord::restore(weekly_hunt_task().config().clone(), original.data().clone());
        assert_eq!(restored.data().progress().kind(), TaskKind::HuntWeekly);
        assert!(restored.status().is_complete());

        restored.update(&CounterSnapshot::new(), &HuntReferenceTable::new());
        assert!(!restored.status().is_complete());
    }

    #[test]
    fn kind_change_keeps_completion_until_update() {
        let mut task = TaskRecord::new(TaskConfig::new(
            "relic",
            "Relic Steps",
            ResetSchedule::Never,
            TaskKindConfig::Threshold {
                threshold: 1,
                mode: ComparisonMode::LessThan,
            },
        ));
        let reference = HuntReferenceTable::new();
        let mut counters = CounterSnapshot::new();
        counters.set_counter("relic", 0);
        task.update(&counters, &reference);
        assert!(task.status().is_complete());

        let mut config = task.config().clone();
        config.kind = TaskKindConfig::Allowance {
            threshold: 1,
            mode: ComparisonMode::LessThan,
            max_allowances: DEFAULT_MAX_ALLOWANCES,
        };
        task.reconfigure(config);
        assert_eq!(task.data().progress(), &Progress::Allowance { remaining: None });
        assert_eq!(task.status(), TaskStatus::Complete);

        // The next update re-derives completion from the new kind
        counters.set_counter("relic", 5);
        assert!(task.update(&counters, &reference));
        assert_eq!(task.status(), TaskStatus::Incomplete);
    }

    #[test]
    fn force_next_state_only_on_weekly_hunts() {
        let mut task = weekly_hunt_task();
        assert_eq!(task.force_next_hunt_state(1), Some(WeeklyHuntState::Obtained));
        assert_eq!(task.force_next_hunt_state(7), None);

        let mut other = allowance_task();
        assert_eq!(other.force_next_hunt_state(1), None);
    }

    #[test]
    fn task_data_round_trips_through_toml() {
        let mut task = weekly_hunt_task();
        task.force_next_hunt_state(2);

        let text = toml::to_string(task.data()).unwrap();
        let data: TaskData = toml::from_str(&text).unwrap();
        assert_eq!(&data, task.data());
    }
}
