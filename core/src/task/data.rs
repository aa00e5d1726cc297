//! Per-task progress
//!
//! Engine-owned mutable state. `complete` is private: it changes only
//! through [`TaskData::update`] and [`TaskData::reset`], never because the
//! configuration changed.

use dutykeeper_types::formatting::format_remaining;
use serde::{Deserialize, Serialize};

use super::config::{TaskKind, TaskKindConfig};
use crate::compare::{TaskStatus, evaluate};
use crate::hunt::{CompoundHuntTracker, WeeklyHuntTracker};
use crate::providers::{CounterProvider, HuntReference};

/// Kind-specific progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Progress {
    /// Last observed counter value (`None` until the first observation)
    Threshold { value: Option<i64> },
    /// Allowances left in the pool (`None` until the first observation)
    Allowance { remaining: Option<i64> },
    HuntWeekly(WeeklyHuntTracker),
    HuntCompound(CompoundHuntTracker),
}

impl Progress {
    /// Zero form for a freshly created task.
    fn initial(kind: &TaskKindConfig) -> Self {
        match kind {
            TaskKindConfig::Threshold { .. } => Self::Threshold { value: None },
            TaskKindConfig::Allowance { .. } => Self::Allowance { remaining: None },
            TaskKindConfig::HuntWeekly { marks } => Self::HuntWeekly(WeeklyHuntTracker::for_config(marks)),
            TaskKindConfig::HuntCompound { orders } => {
                Self::HuntCompound(CompoundHuntTracker::for_config(orders))
            }
        }
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Threshold { .. } => TaskKind::Threshold,
            Self::Allowance { .. } => TaskKind::Allowance,
            Self::HuntWeekly(_) => TaskKind::HuntWeekly,
            Self::HuntCompound(_) => TaskKind::HuntCompound,
        }
    }
}

/// Mutable state of one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskData {
    complete: bool,
    progress: Progress,
}

impl TaskData {
    pub fn new(kind: &TaskKindConfig) -> Self {
        Self {
            complete: false,
            progress: Progress::initial(kind),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn status(&self) -> TaskStatus {
        self.complete.into()
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Bring persisted data in line with the current config.
    ///
    /// Hunt lists are re-synced to the configured marks; a progress shape
    /// that no longer matches the kind is rebuilt from scratch. `complete`
    /// is left as is for the next update or reset to re-derive.
    pub(crate) fn reconcile(&mut self, kind: &TaskKindConfig) -> bool {
        if self.progress.kind() != kind.kind() {
            self.progress = Progress::initial(kind);
            return false;
        }

        match (&mut self.progress, kind) {
            (Progress::HuntWeekly(tracker), TaskKindConfig::HuntWeekly { marks }) => {
                tracker.sync(marks);
            }
            (Progress::HuntCompound(tracker), TaskKindConfig::HuntCompound { orders }) => {
                tracker.sync(orders);
            }
            _ => {}
        }
        true
    }

    /// Re-derive progress and completion from live counters.
    ///
    /// Returns true if anything changed. Missing counters leave the stored
    /// progress untouched.
    pub(crate) fn update(
        &mut self,
        task_id: &str,
        kind: &TaskKindConfig,
        counters: &(impl CounterProvider + ?Sized),
        reference: &(impl HuntReference + ?Sized),
    ) -> bool {
        let mut changed = false;

        let complete = match (&mut self.progress, kind) {
            (Progress::Threshold { value }, TaskKindConfig::Threshold { threshold, mode }) => {
                changed |= observe(value, counters.counter_for(task_id));
                value.is_some_and(|v| evaluate(*mode, *threshold, v).is_complete())
            }
            (
                Progress::Allowance { remaining },
                TaskKindConfig::Allowance {
                    threshold, mode, ..
                },
            ) => {
                changed |= observe(remaining, counters.counter_for(task_id));
                remaining.is_some_and(|v| evaluate(*mode, *threshold, v).is_complete())
            }
            (Progress::HuntWeekly(tracker), TaskKindConfig::HuntWeekly { marks }) => {
                changed |= tracker.update(counters);
                tracker.incomplete_count(marks) == 0
            }
            (Progress::HuntCompound(tracker), TaskKindConfig::HuntCompound { orders }) => {
                changed |= tracker.update(counters, reference);
                tracker.incomplete_count(orders) == 0
            }
            _ => {
                tracing::warn!(task = %task_id, "Task progress does not match its kind; skipping update");
                return false;
            }
        };

        if complete != self.complete {
            self.complete = complete;
            changed = true;
        }
        changed
    }

    /// Clear progress to its zero form and mark the task incomplete.
    pub(crate) fn reset(&mut self, kind: &TaskKindConfig) {
        self.complete = false;
        match (&mut self.progress, kind) {
            (Progress::Threshold { value }, _) => *value = None,
            (Progress::Allowance { remaining }, TaskKindConfig::Allowance { max_allowances, .. }) => {
                *remaining = Some(*max_allowances);
            }
            (Progress::Allowance { remaining }, _) => *remaining = None,
            (Progress::HuntWeekly(tracker), _) => tracker.reset(),
            (Progress::HuntCompound(tracker), _) => tracker.reset(),
        }
    }

    /// Number of things left to do, where the kind has such a count.
    pub fn remaining(&self, kind: &TaskKindConfig) -> Option<i64> {
        match (&self.progress, kind) {
            (Progress::Threshold { value }, _) => *value,
            (Progress::Allowance { remaining }, _) => *remaining,
            (Progress::HuntWeekly(tracker), TaskKindConfig::HuntWeekly { marks }) => {
                Some(tracker.incomplete_count(marks) as i64)
            }
            (Progress::HuntCompound(tracker), TaskKindConfig::HuntCompound { orders }) => {
                Some(tracker.incomplete_count(orders) as i64)
            }
            _ => None,
        }
    }

    pub fn status_message(&self, kind: &TaskKindConfig) -> String {
        let label = match self.progress {
            Progress::Threshold { .. } => "Remaining",
            Progress::Allowance { .. } => "Allowances Remaining",
            Progress::HuntWeekly(_) | Progress::HuntCompound(_) => "Hunts Remaining",
        };
        match self.remaining(kind) {
            Some(count) => format_remaining(count, label),
            None => "No Data".to_string(),
        }
    }

    pub(crate) fn weekly_hunts_mut(&mut self) -> Option<&mut WeeklyHuntTracker> {
        match &mut self.progress {
            Progress::HuntWeekly(tracker) => Some(tracker),
            _ => None,
        }
    }
}

/// Store a fresh observation. Returns true if the stored value changed.
fn observe(slot: &mut Option<i64>, observed: Option<i64>) -> bool {
    match observed {
        Some(value) if *slot != Some(value) => {
            *slot = Some(value);
            true
        }
        _ => false,
    }
}
