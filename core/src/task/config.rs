//! Per-task configuration
//!
//! User-editable settings for one task. The engine only reads these; the
//! `[task.kind]` table selects which progress shape the task carries.

use std::collections::HashSet;

use dutykeeper_types::{ComparisonMode, TaskCategory};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::hunt::TrackedMarkConfig;
use crate::reset::ResetSchedule;

/// Allowances granted per daily cycle unless the config says otherwise.
pub const DEFAULT_MAX_ALLOWANCES: i64 = 12;

/// Kind tag of a task, without its settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Threshold,
    Allowance,
    HuntWeekly,
    HuntCompound,
}

/// Kind-specific settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum TaskKindConfig {
    /// Complete when the live counter passes `threshold`
    Threshold {
        threshold: i64,
        #[serde(default)]
        mode: ComparisonMode,
    },

    /// Like `Threshold`, but the counter is a pool of allowances that refills
    /// to `max_allowances` on reset
    Allowance {
        threshold: i64,
        #[serde(default)]
        mode: ComparisonMode,
        #[serde(default = "default_max_allowances")]
        max_allowances: i64,
    },

    /// Weekly elite marks, one per hunt id
    HuntWeekly {
        #[serde(default)]
        marks: Vec<TrackedMarkConfig>,
    },

    /// Order slots with one or five sub-targets
    HuntCompound {
        #[serde(default)]
        orders: Vec<TrackedMarkConfig>,
    },
}

impl TaskKindConfig {
    pub fn kind(&self) -> TaskKind {
        match self {
            Self::Threshold { .. } => TaskKind::Threshold,
            Self::Allowance { .. } => TaskKind::Allowance,
            Self::HuntWeekly { .. } => TaskKind::HuntWeekly,
            Self::HuntCompound { .. } => TaskKind::HuntCompound,
        }
    }

    /// Mark selection for hunt kinds, empty for counter kinds.
    pub fn tracked_marks(&self) -> &[TrackedMarkConfig] {
        match self {
            Self::HuntWeekly { marks } => marks,
            Self::HuntCompound { orders } => orders,
            Self::Threshold { .. } | Self::Allowance { .. } => &[],
        }
    }
}

/// Configuration of one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Unique identifier, also the key for live counters
    pub id: String,

    /// Display name
    pub name: String,

    #[serde(default = "default_true")]
    pub enabled: bool,

    pub schedule: ResetSchedule,

    /// Overrides `name` in the todo list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub todo_label: Option<String>,

    /// List the task in the todo list while incomplete
    #[serde(default = "default_true")]
    pub show_in_todo: bool,

    /// Show a reset countdown for the task
    #[serde(default = "default_true")]
    pub show_timer: bool,

    pub kind: TaskKindConfig,
}

impl TaskConfig {
    pub fn new(id: impl Into<String>, name: impl Into<String>, schedule: ResetSchedule, kind: TaskKindConfig) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            enabled: true,
            schedule,
            todo_label: None,
            show_in_todo: true,
            show_timer: true,
            kind,
        }
    }

    pub fn category(&self) -> TaskCategory {
        self.schedule.category()
    }

    /// Label shown in the todo list.
    pub fn todo_label(&self) -> &str {
        match &self.todo_label {
            Some(label) if !label.is_empty() => label,
            _ => &self.name,
        }
    }

    /// Reject settings no task could be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.id.trim().is_empty() {
            return Err(ConfigError::InvalidTask {
                id: self.id.clone(),
                reason: "task id is empty".to_string(),
            });
        }

        if let TaskKindConfig::Allowance { max_allowances, .. } = self.kind
            && max_allowances < 0
        {
            return Err(ConfigError::InvalidTask {
                id: self.id.clone(),
                reason: format!("max_allowances must not be negative (got {})", max_allowances),
            });
        }

        let mut seen = HashSet::new();
        for mark in self.kind.tracked_marks() {
            if !seen.insert(mark.id) {
                return Err(ConfigError::InvalidTask {
                    id: self.id.clone(),
                    reason: format!("mark {} is listed twice", mark.id),
                });
            }
        }

        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Serde Helpers
// ═══════════════════════════════════════════════════════════════════════════

fn default_true() -> bool {
    true
}

fn default_max_allowances() -> i64 {
    DEFAULT_MAX_ALLOWANCES
}
