//! In-memory providers
//!
//! Plain value types that implement the provider traits. The CLI loads them
//! from TOML files; tests build them directly.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ClockProvider, CounterProvider, WeeklyMarkRecord};

/// Fixed time and player context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSnapshot {
    pub now: DateTime<Utc>,
    pub region: u8,
    #[serde(default)]
    pub bound_by_duty: bool,
    #[serde(default)]
    pub in_quest_event: bool,
}

impl ClockSnapshot {
    pub fn new(now: DateTime<Utc>, region: u8) -> Self {
        Self {
            now,
            region,
            bound_by_duty: false,
            in_quest_event: false,
        }
    }

    /// Same context at a different instant.
    pub fn at(&self, now: DateTime<Utc>) -> Self {
        Self { now, ..*self }
    }
}

impl ClockProvider for ClockSnapshot {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn region(&self) -> u8 {
        self.region
    }

    fn is_bound_by_duty(&self) -> bool {
        self.bound_by_duty
    }

    fn is_in_quest_event(&self) -> bool {
        self.in_quest_event
    }
}

/// Weekly mark entry as written in a snapshot file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyMarkEntry {
    pub hunt_id: u32,
    #[serde(flatten)]
    pub record: WeeklyMarkRecord,
}

/// Order slot entry as written in a snapshot file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrderSlotEntry {
    pub order_id: u32,
    pub active_bill_id: Option<u32>,
    pub mark_id: Option<u32>,
    #[serde(default)]
    pub kill_counts: Vec<u32>,
}

/// A frozen set of live counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSnapshot {
    #[serde(default)]
    pub counters: HashMap<String, i64>,
    #[serde(default, rename = "weekly_mark")]
    pub weekly_marks: Vec<WeeklyMarkEntry>,
    #[serde(default, rename = "order")]
    pub orders: Vec<OrderSlotEntry>,
}

impl CounterSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_counter(&mut self, task_id: impl Into<String>, value: i64) -> &mut Self {
        self.counters.insert(task_id.into(), value);
        self
    }

    pub fn clear_counter(&mut self, task_id: &str) -> &mut Self {
        self.counters.remove(task_id);
        self
    }

    pub fn set_weekly_mark(&mut self, hunt_id: u32, obtained: bool, first_kill_count: u32) -> &mut Self {
        let record = WeeklyMarkRecord {
            obtained,
            first_kill_count,
        };
        match self.weekly_marks.iter_mut().find(|e| e.hunt_id == hunt_id) {
            Some(entry) => entry.record = record,
            None => self.weekly_marks.push(WeeklyMarkEntry { hunt_id, record }),
        }
        self
    }

    fn order_slot_mut(&mut self, order_id: u32) -> &mut OrderSlotEntry {
        let idx = match self.orders.iter().position(|o| o.order_id == order_id) {
            Some(idx) => idx,
            None => {
                self.orders.push(OrderSlotEntry {
                    order_id,
                    ..Default::default()
                });
                self.orders.len() - 1
            }
        };
        &mut self.orders[idx]
    }

    /// Load a bill into an order slot; active and loaded ids match.
    pub fn accept_bill(&mut self, order_id: u32, bill_id: u32) -> &mut Self {
        let slot = self.order_slot_mut(order_id);
        slot.active_bill_id = Some(bill_id);
        slot.mark_id = Some(bill_id);
        self
    }

    pub fn set_bill_ids(
        &mut self,
        order_id: u32,
        active_bill_id: Option<u32>,
        mark_id: Option<u32>,
    ) -> &mut Self {
        let slot = self.order_slot_mut(order_id);
        slot.active_bill_id = active_bill_id;
        slot.mark_id = mark_id;
        self
    }

    pub fn set_kill_counts(&mut self, order_id: u32, kills: &[u32]) -> &mut Self {
        self.order_slot_mut(order_id).kill_counts = kills.to_vec();
        self
    }

    fn order(&self, order_id: u32) -> Option<&OrderSlotEntry> {
        self.orders.iter().find(|o| o.order_id == order_id)
    }
}

impl CounterProvider for CounterSnapshot {
    fn counter_for(&self, task_id: &str) -> Option<i64> {
        self.counters.get(task_id).copied()
    }

    fn weekly_mark(&self, hunt_id: u32) -> Option<WeeklyMarkRecord> {
        self.weekly_marks
            .iter()
            .find(|e| e.hunt_id == hunt_id)
            .map(|e| e.record)
    }

    fn kill_counts_for(&self, order_id: u32) -> Option<Vec<u32>> {
        self.order(order_id)
            .filter(|o| !o.kill_counts.is_empty())
            .map(|o| o.kill_counts.clone())
    }

    fn active_bill_id_for(&self, order_id: u32) -> Option<u32> {
        self.order(order_id).and_then(|o| o.active_bill_id)
    }

    fn mark_id_for(&self, order_id: u32) -> Option<u32> {
        self.order(order_id).and_then(|o| o.mark_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_counter_snapshot_toml() {
        let toml = r#"
[counters]
tribal_quests = 7

[[weekly_mark]]
hunt_id = 3
obtained = true
first_kill_count = 0

[[order]]
order_id = 1
active_bill_id = 4
mark_id = 4
kill_counts = [3, 3, 1, 0, 0]
"#;

        let snapshot: CounterSnapshot = toml::from_str(toml).unwrap();
        assert_eq!(snapshot.counter_for("tribal_quests"), Some(7));
        assert_eq!(
            snapshot.weekly_mark(3),
            Some(WeeklyMarkRecord {
                obtained: true,
                first_kill_count: 0
            })
        );
        assert_eq!(snapshot.kill_counts_for(1), Some(vec![3, 3, 1, 0, 0]));
        assert_eq!(snapshot.active_bill_id_for(1), Some(4));
        assert_eq!(snapshot.mark_id_for(2), None);
    }

    #[test]
    fn missing_values_read_as_no_data() {
        let snapshot = CounterSnapshot::new();
        assert_eq!(snapshot.counter_for("anything"), None);
        assert_eq!(snapshot.weekly_mark(1), None);
        assert_eq!(snapshot.kill_counts_for(1), None);
    }

    #[test]
    fn setters_overwrite_existing_entries() {
        let mut snapshot = CounterSnapshot::new();
        snapshot.set_weekly_mark(1, true, 0).set_weekly_mark(1, true, 1);
        snapshot.accept_bill(2, 5).set_kill_counts(2, &[1]);
        snapshot.set_bill_ids(2, Some(6), Some(5));

        assert_eq!(snapshot.weekly_marks.len(), 1);
        assert_eq!(snapshot.weekly_mark(1).map(|r| r.first_kill_count), Some(1));
        assert_eq!(snapshot.orders.len(), 1);
        assert_eq!(snapshot.active_bill_id_for(2), Some(6));
        assert_eq!(snapshot.mark_id_for(2), Some(5));
    }
}
