//! Read-only projections of the registry for display collaborators.

use chrono::TimeDelta;
use dutykeeper_types::formatting::format_timespan;
use dutykeeper_types::{TaskCategory, TimerOptions, TodoOptions};

use super::TaskRegistry;
use crate::providers::ClockProvider;

/// Incomplete, enabled tasks per category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub daily: usize,
    pub weekly: usize,
    pub special: usize,
}

impl Summary {
    pub fn get(&self, category: TaskCategory) -> usize {
        match category {
            TaskCategory::Daily => self.daily,
            TaskCategory::Weekly => self.weekly,
            TaskCategory::Special => self.special,
        }
    }

    pub fn total(&self) -> usize {
        self.daily + self.weekly + self.special
    }
}

/// One line of the todo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoEntry {
    pub category: TaskCategory,
    pub task_id: String,
    pub label: String,
}

/// Countdown to a task's next reset.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerEntry {
    pub task_id: String,
    pub name: String,
    /// Time left until the reset, `None` for tasks that never reset
    pub remaining: Option<TimeDelta>,
    /// Elapsed share of the current period, 0.0 - 1.0
    pub progress: f32,
    /// `D.HH:MM[:SS]`, empty for tasks that never reset
    pub text: String,
    pub complete: bool,
}

impl TaskRegistry {
    pub fn summary(&self) -> Summary {
        let mut summary = Summary::default();
        for task in self.iter() {
            let record = task.record();
            if !record.is_enabled() || record.status().is_complete() {
                continue;
            }
            match record.category() {
                TaskCategory::Daily => summary.daily += 1,
                TaskCategory::Weekly => summary.weekly += 1,
                TaskCategory::Special => summary.special += 1,
            }
        }
        summary
    }

    /// Incomplete, enabled tasks grouped by category.
    ///
    /// Empty while the list is switched off or while the player is in a
    /// duty or quest event and the options hide it there.
    pub fn todo_entries(
        &self,
        clock: &(impl ClockProvider + ?Sized),
        options: &TodoOptions,
    ) -> Vec<TodoEntry> {
        if !options.enabled
            || (options.hide_in_duties && clock.is_bound_by_duty())
            || (options.hide_during_quests && clock.is_in_quest_event())
        {
            return Vec::new();
        }

        let mut entries = Vec::new();
        for category in TaskCategory::ALL {
            if !options.shows(category) {
                continue;
            }
            entries.extend(
                self.iter()
                    .map(|t| t.record())
                    .filter(|r| r.is_enabled() && r.config().show_in_todo && r.category() == category)
                    .filter(|r| !r.status().is_complete())
                    .map(|r| TodoEntry {
                        category,
                        task_id: r.id().to_string(),
                        label: r.config().todo_label().to_string(),
                    }),
            );
        }
        entries
    }

    /// Reset countdowns for enabled tasks.
    ///
    /// Counts down to the boundary cached by the last tick, falling back to a
    /// fresh computation for tasks not ticked yet. Tasks whose schedule cannot
    /// be resolved are left out.
    pub fn timers(
        &self,
        clock: &(impl ClockProvider + ?Sized),
        options: &TimerOptions,
    ) -> Vec<TimerEntry> {
        if !options.enabled
            || (options.hide_in_duties && clock.is_bound_by_duty())
            || (options.hide_in_quest_events && clock.is_in_quest_event())
        {
            return Vec::new();
        }

        let now = clock.now();
        let region = clock.region();

        let mut timers = Vec::new();
        for task in self.iter() {
            let record = task.record();
            let complete = record.status().is_complete();
            if !record.is_enabled()
                || !record.config().show_timer
                || (options.hide_when_complete && complete)
            {
                continue;
            }

            // Count down to the boundary the next tick will actually fire at
            let schedule = record.schedule();
            let next = match task.next_reset() {
                Some(cached) => Some(cached),
                None if task.schedule_error().is_some() => continue,
                None => match schedule.next_reset(region, now) {
                    Ok(next) => next,
                    Err(_) => continue,
                },
            };

            let (remaining, progress, text) = match (next, schedule.period()) {
                (Some(next), Some(period)) => {
                    let remaining = (next - now).max(TimeDelta::zero());
                    let fraction = remaining.num_seconds() as f64 / period.num_seconds() as f64;
                    let progress = (1.0 - fraction).clamp(0.0, 1.0) as f32;
                    let secs = u64::try_from(remaining.num_seconds()).unwrap_or(0);
                    (Some(remaining), progress, format_timespan(secs, options.hide_seconds))
                }
                _ => (None, 1.0, String::new()),
            };

            timers.push(TimerEntry {
                task_id: record.id().to_string(),
                name: record.config().name.clone(),
                remaining,
                progress,
                text,
                complete,
            });
        }
        timers
    }
}
