//! Inventory ledger.
//!
//! Items keep their stock in base units. Every quantity entering or leaving the
//! ledger is converted through the item's packing unit factor first.

pub mod catalog;
pub mod types;

#[cfg(test)]
mod conversion_props;

pub use catalog::Inventory;
pub use types::{
    InventoryItem, ItemPatch, NewItem, NewPackingUnit, PackingUnit, StockDelta, UnitRef,
};
