//! Threshold comparison for counter-driven tasks.

use dutykeeper_types::ComparisonMode;
use serde::{Deserialize, Serialize};

/// Binary completion status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Incomplete,
    Complete,
}

impl TaskStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl From<bool> for TaskStatus {
    fn from(complete: bool) -> Self {
        if complete { Self::Complete } else { Self::Incomplete }
    }
}

/// Compare a configured threshold against a live counter value.
///
/// The threshold is the left-hand side: `LessThan` completes when
/// `threshold > live`, i.e. once the live value has dropped below it.
pub fn evaluate(mode: ComparisonMode, threshold: i64, live: i64) -> TaskStatus {
    let complete = match mode {
        ComparisonMode::LessThan => threshold > live,
        ComparisonMode::EqualTo => threshold == live,
        ComparisonMode::LessThanOrEqual => threshold >= live,
    };
    complete.into()
}
