//! Compound hunt orders
//!
//! An order slot holds one bill at a time. Elite bills carry a single
//! target; normal bills carry five. The order is complete when every
//! sub-target's live kill count equals the count required by the reference
//! tables. Completion latches until the owning task resets, so a glitched
//! counter later in the week cannot un-complete it.

use serde::{Deserialize, Serialize};

use super::{TrackedMarkConfig, reconcile};
use crate::providers::{CounterProvider, HuntReference, OrderType};

/// Check every sub-target of `order_type` at `row` against `kills`.
///
/// Missing kill slots or missing reference rows count as not done.
pub fn is_order_complete(
    order_type: OrderType,
    row: u32,
    kills: &[u32],
    reference: &(impl HuntReference + ?Sized),
) -> bool {
    (0..order_type.sub_target_count()).all(|index| {
        match (kills.get(index), reference.required_kills(row, index)) {
            (Some(&live), Some(needed)) => live == needed,
            _ => false,
        }
    })
}

/// Tracked state for one order slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundOrder {
    pub order_id: u32,
    complete: bool,
}

impl CompoundOrder {
    pub fn new(order_id: u32) -> Self {
        Self {
            order_id,
            complete: false,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Re-derive completion. Returns true if the order just completed.
    ///
    /// The slot is only evaluated while its active bill is the one loaded
    /// into it; until then the order simply stays incomplete.
    pub fn update(
        &mut self,
        counters: &(impl CounterProvider + ?Sized),
        reference: &(impl HuntReference + ?Sized),
    ) -> bool {
        if self.complete {
            return false;
        }

        let (Some(active), Some(mark_id)) = (
            counters.active_bill_id_for(self.order_id),
            counters.mark_id_for(self.order_id),
        ) else {
            return false;
        };
        if active != mark_id {
            return false;
        }

        let (Some(order_type), Some(offset)) = (
            reference.order_type(self.order_id),
            reference.sub_target_row_offset(self.order_id),
        ) else {
            tracing::trace!(order = self.order_id, "No reference data for hunt order");
            return false;
        };
        let Some(row) = offset.checked_add(mark_id).and_then(|r| r.checked_sub(1)) else {
            return false;
        };
        let Some(kills) = counters.kill_counts_for(self.order_id) else {
            return false;
        };

        if is_order_complete(order_type, row, &kills, reference) {
            self.complete = true;
            return true;
        }
        false
    }
}

/// All order slots of one task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundHuntTracker {
    orders: Vec<CompoundOrder>,
}

impl CompoundHuntTracker {
    pub fn for_config(configured: &[TrackedMarkConfig]) -> Self {
        let mut tracker = Self::default();
        tracker.sync(configured);
        tracker
    }

    /// Align the order list with the configured ids, keeping existing states.
    pub fn sync(&mut self, configured: &[TrackedMarkConfig]) {
        reconcile(&mut self.orders, configured, |o| o.order_id, CompoundOrder::new);
    }

    pub fn orders(&self) -> &[CompoundOrder] {
        &self.orders
    }

    pub fn get(&self, order_id: u32) -> Option<&CompoundOrder> {
        self.orders.iter().find(|o| o.order_id == order_id)
    }

    /// Returns true if any order completed during this update.
    pub fn update(
        &mut self,
        counters: &(impl CounterProvider + ?Sized),
        reference: &(impl HuntReference + ?Sized),
    ) -> bool {
        let mut changed = false;
        for order in &mut self.orders {
            changed |= order.update(counters, reference);
        }
        changed
    }

    pub fn reset(&mut self) {
        for order in &mut self.orders {
            order.complete = false;
        }
    }

    /// Tracked orders not yet complete.
    pub fn incomplete_count(&self, configured: &[TrackedMarkConfig]) -> usize {
        configured
            .iter()
            .filter(|c| c.tracked)
            .filter(|c| !self.get(c.id).is_some_and(CompoundOrder::is_complete))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hunt::HuntReferenceTable;
    use crate::providers::CounterSnapshot;

    const NORMAL_ORDER: u32 = 1;
    const ELITE_ORDER: u32 = 6;

    /// Normal order 1 starts at row 10, elite order 6 at row 40.
    /// Bill 3 of order 1 uses row 12; bill 1 of order 6 uses row 40.
    fn reference() -> HuntReferenceTable {
        let mut table = HuntReferenceTable::new();
        table
            .insert_order(NORMAL_ORDER, OrderType::Normal, 10)
            .insert_order(ELITE_ORDER, OrderType::Elite, 40)
            .insert_target(12, &[3, 3, 3, 3, 3])
            .insert_target(40, &[1]);
        table
    }

    #[test]
    fn normal_order_needs_all_five() {
        let reference = reference();
        let mut counters = CounterSnapshot::new();
        counters.accept_bill(NORMAL_ORDER, 3).set_kill_counts(NORMAL_ORDER, &[3, 3, 3, 3, 2]);

        let mut order = CompoundOrder::new(NORMAL_ORDER);
        assert!(!order.update(&counters, &reference));
        assert!(!order.is_complete());

        counters.set_kill_counts(NORMAL_ORDER, &[3, 3, 3, 3, 3]);
        assert!(order.update(&counters, &reference));
        assert!(order.is_complete());
    }

    #[test]
    fn completion_latches_until_reset() {
        let reference = reference();
        let mut counters = CounterSnapshot::new();
        counters.accept_bill(NORMAL_ORDER, 3).set_kill_counts(NORMAL_ORDER, &[3; 5]);

        let mut tracker = CompoundHuntTracker::for_config(&[TrackedMarkConfig::new(NORMAL_ORDER)]);
        assert!(tracker.update(&counters, &reference));

        counters.set_kill_counts(NORMAL_ORDER, &[3, 3, 0, 3, 3]);
        assert!(!tracker.update(&counters, &reference));
        assert!(tracker.get(NORMAL_ORDER).is_some_and(CompoundOrder::is_complete));

        tracker.reset();
        assert!(!tracker.get(NORMAL_ORDER).is_some_and(CompoundOrder::is_complete));
        assert!(!tracker.update(&counters, &reference));
    }

    #[test]
    fn elite_order_checks_single_target() {
        let reference = reference();
        let mut counters = CounterSnapshot::new();
        counters.accept_bill(ELITE_ORDER, 1).set_kill_counts(ELITE_ORDER, &[0]);

        let mut order = CompoundOrder::new(ELITE_ORDER);
        assert!(!order.update(&counters, &reference));

        counters.set_kill_counts(ELITE_ORDER, &[1, 0, 0, 0, 0]);
        assert!(order.update(&counters, &reference));
    }

    #[test]
    fn overshooting_the_requirement_is_not_complete() {
        let reference = reference();
        let mut counters = CounterSnapshot::new();
        counters.accept_bill(NORMAL_ORDER, 3).set_kill_counts(NORMAL_ORDER, &[4, 3, 3, 3, 3]);

        let mut order = CompoundOrder::new(NORMAL_ORDER);
        assert!(!order.update(&counters, &reference));
    }

    #[test]
    fn mismatched_bill_is_skipped() {
        let reference = reference();
        let mut counters = CounterSnapshot::new();
        counters
            .set_bill_ids(NORMAL_ORDER, Some(2), Some(3))
            .set_kill_counts(NORMAL_ORDER, &[3; 5]);

        let mut order = CompoundOrder::new(NORMAL_ORDER);
        assert!(!order.update(&counters, &reference));
        assert!(!order.is_complete());
    }

    #[test]
    fn missing_data_is_not_an_error() {
        let reference = reference();
        let mut order = CompoundOrder::new(NORMAL_ORDER);
        assert!(!order.update(&CounterSnapshot::new(), &reference));

        let mut counters = CounterSnapshot::new();
        counters.accept_bill(NORMAL_ORDER, 3);
        assert!(!order.update(&counters, &reference));

        // Order unknown to the reference tables
        let mut unknown = CompoundOrder::new(99);
        counters.accept_bill(99, 1).set_kill_counts(99, &[1]);
        assert!(!unknown.update(&counters, &reference));
    }

    #[test]
    fn short_kill_array_is_incomplete() {
        let reference = reference();
        assert!(!is_order_complete(OrderType::Normal, 12, &[3, 3, 3], &reference));
        assert!(is_order_complete(OrderType::Normal, 12, &[3, 3, 3, 3, 3], &reference));
    }
}
