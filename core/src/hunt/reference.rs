//! Static hunt order tables
//!
//! Mirrors the two game sheets the compound tracker needs: the order sheet
//! (type and first target row per order) and the target sheet (kills needed
//! per sub-target).

use std::fs;
use std::path::Path;

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::providers::{HuntReference, OrderType};

/// One row of the order sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: u32,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    /// First row of this order's targets in the target sheet
    pub target_offset: u32,
}

/// One row of the target sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRow {
    pub row: u32,
    /// Kills needed per sub-target, in slot order
    pub needed_kills: Vec<u32>,
}

/// File layout of a reference table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReferenceFile {
    #[serde(default, rename = "order")]
    pub orders: Vec<OrderRow>,
    #[serde(default, rename = "target")]
    pub targets: Vec<TargetRow>,
}

/// Indexed reference tables.
#[derive(Debug, Clone, Default)]
pub struct HuntReferenceTable {
    orders: HashMap<u32, OrderRow>,
    targets: HashMap<u32, Vec<u32>>,
}

impl HuntReferenceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(file: ReferenceFile) -> Self {
        let mut table = Self::new();
        for order in file.orders {
            table.orders.insert(order.id, order);
        }
        for target in file.targets {
            table.targets.insert(target.row, target.needed_kills);
        }
        table
    }

    /// Load a reference table from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let file: ReferenceFile = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::from_file(file))
    }

    pub fn insert_order(&mut self, id: u32, order_type: OrderType, target_offset: u32) -> &mut Self {
        self.orders.insert(
            id,
            OrderRow {
                id,
                order_type,
                target_offset,
            },
        );
        self
    }

    pub fn insert_target(&mut self, row: u32, needed_kills: &[u32]) -> &mut Self {
        self.targets.insert(row, needed_kills.to_vec());
        self
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }
}

impl HuntReference for HuntReferenceTable {
    fn order_type(&self, order_id: u32) -> Option<OrderType> {
        self.orders.get(&order_id).map(|o| o.order_type)
    }

    fn sub_target_row_offset(&self, order_id: u32) -> Option<u32> {
        self.orders.get(&order_id).map(|o| o.target_offset)
    }

    fn required_kills(&self, row: u32, index: usize) -> Option<u32> {
        self.targets.get(&row).and_then(|kills| kills.get(index).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_reference_toml() {
        let toml = r#"
[[order]]
id = 1
type = "normal"
target_offset = 10

[[order]]
id = 6
type = "elite"
target_offset = 40

[[target]]
row = 12
needed_kills = [3, 3, 3, 5, 5]
"#;

        let file: ReferenceFile = toml::from_str(toml).unwrap();
        let table = HuntReferenceTable::from_file(file);

        assert_eq!(table.order_count(), 2);
        assert_eq!(table.order_type(6), Some(OrderType::Elite));
        assert_eq!(table.sub_target_row_offset(1), Some(10));
        assert_eq!(table.required_kills(12, 3), Some(5));
        assert_eq!(table.required_kills(12, 5), None);
        assert_eq!(table.required_kills(13, 0), None);
    }
}
