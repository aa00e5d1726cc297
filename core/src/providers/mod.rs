//! Contracts for everything the engine reads from the outside world.
//!
//! The engine never touches the game process directly. A host supplies the
//! current time and region, the live progress counters, and the static hunt
//! tables through these traits; tests supply the in-memory snapshots from
//! [`snapshot`].
//!
//! Every counter accessor returns `Option`: `None` means "no data yet" and is
//! treated as no progress, never as an error.

pub mod snapshot;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use snapshot::{ClockSnapshot, CounterSnapshot};

/// Source of the current time and player context.
pub trait ClockProvider {
    fn now(&self) -> DateTime<Utc>;

    /// Data-center region code of the player's home world.
    fn region(&self) -> u8;

    fn is_bound_by_duty(&self) -> bool;

    fn is_in_quest_event(&self) -> bool;
}

/// Per-mark snapshot the weekly hunt tracker consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WeeklyMarkRecord {
    /// The mark bill is currently held
    pub obtained: bool,
    /// Kill counter of the first (only) target
    pub first_kill_count: u32,
}

/// Live progress values.
pub trait CounterProvider {
    /// Counter for a threshold or allowance task, keyed by task id.
    fn counter_for(&self, task_id: &str) -> Option<i64>;

    /// Bill state for a weekly hunt mark.
    fn weekly_mark(&self, hunt_id: u32) -> Option<WeeklyMarkRecord>;

    /// Kills so far for each sub-target of an order, in slot order.
    fn kill_counts_for(&self, order_id: u32) -> Option<Vec<u32>>;

    /// Bill the game reports as active for this order slot.
    fn active_bill_id_for(&self, order_id: u32) -> Option<u32>;

    /// Bill id loaded into this order slot; also selects the target row.
    fn mark_id_for(&self, order_id: u32) -> Option<u32>;
}

/// How many sub-targets an order carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// One elite target
    Elite,
    /// Five regular targets
    Normal,
}

impl OrderType {
    pub fn sub_target_count(&self) -> usize {
        match self {
            Self::Elite => 1,
            Self::Normal => 5,
        }
    }
}

/// Static hunt reference tables.
pub trait HuntReference {
    fn order_type(&self, order_id: u32) -> Option<OrderType>;

    /// Row of the first sub-target of this order in the target table.
    fn sub_target_row_offset(&self, order_id: u32) -> Option<u32>;

    /// Kills needed for sub-target `index` of the target row `row`.
    fn required_kills(&self, row: u32, index: usize) -> Option<u32>;
}
