//! Hunt mark tracking
//!
//! Two trackers share this module:
//! - **Weekly**: one elite bill per expansion, a three-state machine driven
//!   by "bill held" and "first target killed" counters
//! - **Compound**: order slots with one or five sub-targets, completed when
//!   every live kill count matches the reference tables
//!
//! Both keep one entry per configured mark and report how many *tracked*
//! marks remain.

mod compound;
mod reference;
mod weekly;

pub use compound::{CompoundHuntTracker, CompoundOrder, is_order_complete};
pub use reference::{HuntReferenceTable, OrderRow, ReferenceFile, TargetRow};
pub use weekly::{WeeklyHuntState, WeeklyHuntTracker, WeeklyMark};

use serde::{Deserialize, Serialize};

/// User selection for one mark or order slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedMarkConfig {
    /// Hunt id (weekly) or order id (compound)
    pub id: u32,
    /// Whether this mark counts toward the task's remaining total
    #[serde(default = "default_true")]
    pub tracked: bool,
}

impl TrackedMarkConfig {
    pub fn new(id: u32) -> Self {
        Self { id, tracked: true }
    }

    pub fn untracked(id: u32) -> Self {
        Self { id, tracked: false }
    }
}

fn default_true() -> bool {
    true
}

/// Rebuild `entries` so it holds exactly one entry per configured id, in
/// config order, reusing existing entries where the id matches.
fn reconcile<T>(
    entries: &mut Vec<T>,
    configured: &[TrackedMarkConfig],
    id_of: impl Fn(&T) -> u32,
    make: impl Fn(u32) -> T,
) {
    let mut previous = std::mem::take(entries);
    for config in configured {
        let entry = match previous.iter().position(|e| id_of(e) == config.id) {
            Some(idx) => previous.swap_remove(idx),
            None => make(config.id),
        };
        entries.push(entry);
    }
}
