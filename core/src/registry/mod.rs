//! Task registry
//!
//! Owns every task record and drives its lifecycle from the host's tick:
//!
//! ```text
//!   ClockProvider ──► now, region
//!                        │
//!                        ▼
//!   for each task:  now >= cached next_reset? ──yes──► Reset, recompute next_reset
//!                        │
//!                        ▼
//!                   enabled? ──yes──► Update(counters, reference)
//!                        │
//!                        ▼
//!                   TickReport (resets, changed, schedule errors)
//! ```
//!
//! The registry never owns a timer. Resets fire when a tick observes that
//! the cached boundary has passed, so a host that was offline across several
//! boundaries sees exactly one reset on its next tick.

mod views;


pub use views::{Summary, TimerEntry, TodoEntry};

use chrono::{DateTime, Utc};
use rayon::prelude::*;

use crate::config::DutyConfig;
use crate::hunt::WeeklyHuntState;
use crate::providers::{ClockProvider, CounterProvider, HuntReference};
use crate::reset::ResetError;
use crate::task::{TaskConfig, TaskData, TaskRecord};

/// Errors from registry bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Task '{0}' is already registered")]
    DuplicateTask(String),

    #[error("No task with id '{0}'")]
    UnknownTask(String),
}

// ═══════════════════════════════════════════════════════════════════════════
// Tracked Task
// ═══════════════════════════════════════════════════════════════════════════

/// A task record plus the reset bookkeeping the registry keeps for it.
#[derive(Debug, Clone)]
pub struct TrackedTask {
    record: TaskRecord,
    /// Cached boundary; `None` until computed, or for tasks that never reset
    next_reset: Option<DateTime<Utc>>,
    /// Last schedule error, kept so it is logged once rather than per tick
    schedule_error: Option<ResetError>,
}

/// What one tick did to one task.
#[derive(Debug, Clone, Copy, Default)]
struct TaskTick {
    reset: bool,
    changed: bool,
    error: Option<ResetError>,
}

impl TrackedTask {
    fn new(record: TaskRecord, next_reset: Option<DateTime<Utc>>) -> Self {
        Self {
            record,
            next_reset,
            schedule_error: None,
        }
    }

    pub fn record(&self) -> &TaskRecord {
        &self.record
    }

    pub fn id(&self) -> &str {
        self.record.id()
    }

    /// Boundary the next reset fires at, as last computed.
    pub fn next_reset(&self) -> Option<DateTime<Utc>> {
        self.next_reset
    }

    pub fn schedule_error(&self) -> Option<ResetError> {
        self.schedule_error
    }

    fn tick(
        &mut self,
        now: DateTime<Utc>,
        region: u8,
        counters: &(impl CounterProvider + ?Sized),
        reference: &(impl HuntReference + ?Sized),
    ) -> TaskTick {
        let mut outcome = TaskTick::default();

        if let Some(due) = self.next_reset
            && now >= due
        {
            self.record.reset();
            self.next_reset = None;
            outcome.reset = true;
            outcome.changed = true;
            tracing::debug!(task = %self.record.id(), due = %due, "Task reset");
        }

        if self.next_reset.is_none() {
            self.refresh_schedule(now, region);
        }
        outcome.error = self.schedule_error;

        if self.record.is_enabled() {
            outcome.changed |= self.record.update(counters, reference);
        }
        outcome
    }

    /// Compute the next boundary. Errors are logged when they first appear or
    /// change, and once more when they clear.
    fn refresh_schedule(&mut self, now: DateTime<Utc>, region: u8) {
        match self.record.schedule().next_reset(region, now) {
            Ok(next) => {
                if self.schedule_error.take().is_some() {
                    tracing::info!(task = %self.record.id(), region, "Reset schedule resolved");
                }
                self.next_reset = next;
                if let Some(next_reset) = next {
                    tracing::trace!(task = %self.record.id(), next_reset = %next_reset, "Next reset");
                }
            }
            Err(err) => {
                if self.schedule_error != Some(err) {
                    tracing::error!(task = %self.record.id(), region, error = %err, "Cannot compute reset");
                    self.schedule_error = Some(err);
                }
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tick Report
// ═══════════════════════════════════════════════════════════════════════════

/// Result of one pass over the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tasks whose reset boundary was crossed this tick
    pub resets: Vec<String>,
    /// Tasks whose data changed (reset or update); worth persisting
    pub changed: Vec<String>,
    /// Tasks whose next reset cannot be computed
    pub errors: Vec<(String, ResetError)>,
}

impl TickReport {
    fn record(&mut self, id: &str, tick: TaskTick) {
        if tick.reset {
            self.resets.push(id.to_string());
        }
        if tick.changed {
            self.changed.push(id.to_string());
        }
        if let Some(err) = tick.error {
            self.errors.push((id.to_string(), err));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.resets.is_empty() && self.changed.is_empty() && self.errors.is_empty()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════════

/// Ordered collection of tracked tasks.
#[derive(Debug, Clone, Default)]
pub struct TaskRegistry {
    tasks: Vec<TrackedTask>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with a fresh record for every configured task.
    pub fn from_config(config: &DutyConfig) -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        for task in &config.tasks {
            registry.register(task.clone())?;
        }
        Ok(registry)
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|t| t.id() == id)
    }

    fn insert(&mut self, task: TrackedTask) -> Result<(), RegistryError> {
        if self.position(task.id()).is_some() {
            return Err(RegistryError::DuplicateTask(task.id().to_string()));
        }
        tracing::debug!(task = %task.id(), category = ?task.record.category(), "Registered task");
        self.tasks.push(task);
        Ok(())
    }

    /// Add a task in its initial, incomplete state. Its first reset boundary
    /// is computed on the next tick.
    pub fn register(&mut self, config: TaskConfig) -> Result<(), RegistryError> {
        self.insert(TrackedTask::new(TaskRecord::new(config), None))
    }

    /// Add a task rebuilt from persisted progress and its persisted boundary.
    ///
    /// A boundary that has already passed fires one reset on the next tick.
    pub fn restore(
        &mut self,
        config: TaskConfig,
        data: TaskData,
        next_reset: Option<DateTime<Utc>>,
    ) -> Result<(), RegistryError> {
        self.insert(TrackedTask::new(TaskRecord::restore(config, data), next_reset))
    }

    /// Remove a task and hand back its record.
    pub fn unregister(&mut self, id: &str) -> Result<TaskRecord, RegistryError> {
        let idx = self
            .position(id)
            .ok_or_else(|| RegistryError::UnknownTask(id.to_string()))?;
        tracing::debug!(task = %id, "Unregistered task");
        Ok(self.tasks.remove(idx).record)
    }

    /// Replace a task's settings, keeping its progress where the kind allows.
    pub fn reconfigure(&mut self, config: TaskConfig) -> Result<(), RegistryError> {
        let idx = self
            .position(&config.id)
            .ok_or_else(|| RegistryError::UnknownTask(config.id.clone()))?;
        let task = &mut self.tasks[idx];
        if task.record.schedule() != config.schedule {
            task.next_reset = None;
        }
        task.record.reconfigure(config);
        Ok(())
    }

    /// Step a weekly mark of a hunt task to its next state.
    pub fn force_next_hunt_state(
        &mut self,
        task_id: &str,
        hunt_id: u32,
    ) -> Result<Option<WeeklyHuntState>, RegistryError> {
        let idx = self
            .position(task_id)
            .ok_or_else(|| RegistryError::UnknownTask(task_id.to_string()))?;
        Ok(self.tasks[idx].record.force_next_hunt_state(hunt_id))
    }

    pub fn get(&self, id: &str) -> Option<&TrackedTask> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedTask> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Run one tick over every task in registration order.
    pub fn tick(
        &mut self,
        clock: &(impl ClockProvider + ?Sized),
        counters: &(impl CounterProvider + ?Sized),
        reference: &(impl HuntReference + ?Sized),
    ) -> TickReport {
        let now = clock.now();
        let region = clock.region();

        let mut report = TickReport::default();
        for task in &mut self.tasks {
            let tick = task.tick(now, region, counters, reference);
            report.record(task.id(), tick);
        }
        report
    }

    /// Same as [`TaskRegistry::tick`], with records updated in parallel.
    ///
    /// Each record is touched by exactly one worker; the report keeps
    /// registration order.
    pub fn tick_parallel<C, R>(
        &mut self,
        clock: &(impl ClockProvider + ?Sized),
        counters: &C,
        reference: &R,
    ) -> TickReport
    where
        C: CounterProvider + Sync + ?Sized,
        R: HuntReference + Sync + ?Sized,
    {
        let now = clock.now();
        let region = clock.region();

        let ticks: Vec<TaskTick> = self
            .tasks
            .par_iter_mut()
            .map(|task| task.tick(now, region, counters, reference))
            .collect();

        let mut report = TickReport::default();
        for (task, tick) in self.tasks.iter().zip(ticks) {
            report.record(task.id(), tick);
        }
        report
    }
}
