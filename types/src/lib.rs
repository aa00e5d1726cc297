//! Shared configuration types for dutykeeper.
//!
//! These types are serialized into the user's config file and read by both
//! the engine (`dutykeeper-core`) and its front ends.

pub mod formatting;

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// Task classification
// ═══════════════════════════════════════════════════════════════════════════

/// Which reset cycle a task belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Daily,
    Weekly,
    /// No periodic reset; completion follows external counters only.
    Special,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 3] = [Self::Daily, Self::Weekly, Self::Special];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Daily => "Daily Tasks",
            Self::Weekly => "Weekly Tasks",
            Self::Special => "Special Tasks",
        }
    }
}

/// How a task's threshold is compared against its live counter.
///
/// The set is closed: an unknown mode in a config file is rejected when the
/// file is parsed, never at evaluation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// Complete when `threshold > live`
    #[default]
    LessThan,
    /// Complete when `threshold == live`
    EqualTo,
    /// Complete when `threshold >= live`
    LessThanOrEqual,
}

// ═══════════════════════════════════════════════════════════════════════════
// Display options
// ═══════════════════════════════════════════════════════════════════════════

/// Options for the todo list of incomplete tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoOptions {
    pub enabled: bool,
    pub daily_tasks: bool,
    pub weekly_tasks: bool,
    pub special_tasks: bool,
    pub hide_in_duties: bool,
    pub hide_during_quests: bool,
}

impl Default for TodoOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            daily_tasks: true,
            weekly_tasks: true,
            special_tasks: true,
            hide_in_duties: true,
            hide_during_quests: true,
        }
    }
}

impl TodoOptions {
    /// Whether tasks of this category appear in the list at all.
    pub fn shows(&self, category: TaskCategory) -> bool {
        match category {
            TaskCategory::Daily => self.daily_tasks,
            TaskCategory::Weekly => self.weekly_tasks,
            TaskCategory::Special => self.special_tasks,
        }
    }
}

/// Options for the per-task reset countdown bars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerOptions {
    pub enabled: bool,
    pub hide_in_duties: bool,
    pub hide_in_quest_events: bool,
    /// Drop timers for tasks that are already complete
    pub hide_when_complete: bool,
    pub hide_seconds: bool,
}

impl Default for TimerOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            hide_in_duties: false,
            hide_in_quest_events: false,
            hide_when_complete: false,
            hide_seconds: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comparison_mode_parses_snake_case() {
        #[derive(Deserialize)]
        struct Wrapper {
            mode: ComparisonMode,
        }

        let parsed: Wrapper = toml::from_str(r#"mode = "less_than_or_equal""#).unwrap();
        assert_eq!(parsed.mode, ComparisonMode::LessThanOrEqual);
    }

    #[test]
    fn unknown_comparison_mode_is_rejected() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Wrapper {
            mode: ComparisonMode,
        }

        assert!(toml::from_str::<Wrapper>(r#"mode = "greater_than""#).is_err());
    }

    #[test]
    fn todo_options_fill_missing_fields_with_defaults() {
        let options: TodoOptions = toml::from_str("special_tasks = false").unwrap();
        assert!(options.enabled);
        assert!(options.shows(TaskCategory::Daily));
        assert!(!options.shows(TaskCategory::Special));
    }
}
