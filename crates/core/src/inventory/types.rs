//! Inventory domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mizan_shared::types::{ItemId, MoneyError, PackingUnitId, checked_product};

use crate::error::LedgerError;

/// The unit a line item quantity is expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitRef {
    /// The item's base unit.
    #[default]
    Base,
    /// One of the item's packing units.
    Packing(PackingUnitId),
}

/// A larger unit defined by a conversion factor to the base unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackingUnit {
    /// Identifier.
    pub id: PackingUnitId,
    /// Unit name (registered in the unit catalogue).
    pub name: String,
    /// Base units per packing unit.
    pub factor: Decimal,
    /// `factor × item purchase price`.
    pub purchase_price: Decimal,
    /// `factor × item sale price`.
    pub sale_price: Decimal,
}

/// A stock-tracked item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    /// Identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Name of the smallest tracked unit.
    pub base_unit: String,
    /// Packing units.
    pub units: Vec<PackingUnit>,
    /// Purchase price per base unit.
    pub purchase_price: Decimal,
    /// Sale price per base unit.
    pub sale_price: Decimal,
    /// Stock on hand in base units.
    pub stock: Decimal,
    /// Category label.
    pub category: Option<String>,
    /// Barcode.
    pub barcode: Option<String>,
    /// Soft-delete flag.
    pub is_archived: bool,
}

impl InventoryItem {
    /// Looks up one of the item's packing units.
    pub fn unit(&self, id: PackingUnitId) -> Result<&PackingUnit, LedgerError> {
        self.units
            .iter()
            .find(|u| u.id == id)
            .ok_or(LedgerError::UnknownPackingUnit {
                item: self.id,
                unit: id,
            })
    }

    /// Converts a quantity in `unit` to base units.
    pub fn base_quantity(&self, unit: UnitRef, quantity: Decimal) -> Result<Decimal, LedgerError> {
        match unit {
            UnitRef::Base => Ok(quantity),
            UnitRef::Packing(id) => Ok(checked_product(quantity, self.unit(id)?.factor)?),
        }
    }

    /// Display name of `unit`.
    pub fn unit_name(&self, unit: UnitRef) -> Result<&str, LedgerError> {
        match unit {
            UnitRef::Base => Ok(&self.base_unit),
            UnitRef::Packing(id) => Ok(&self.unit(id)?.name),
        }
    }

    /// Recomputes packing unit prices from the base prices.
    ///
    /// Nothing changes if any price overflows.
    pub fn reprice_units(&mut self) -> Result<(), MoneyError> {
        let prices = self
            .units
            .iter()
            .map(|unit| {
                Ok((
                    checked_product(unit.factor, self.purchase_price)?,
                    checked_product(unit.factor, self.sale_price)?,
                ))
            })
            .collect::<Result<Vec<_>, MoneyError>>()?;
        for (unit, (purchase_price, sale_price)) in self.units.iter_mut().zip(prices) {
            unit.purchase_price = purchase_price;
            unit.sale_price = sale_price;
        }
        Ok(())
    }

    /// Cost of the stock on hand at the current purchase price.
    pub fn stock_value(&self) -> Result<Decimal, MoneyError> {
        checked_product(self.stock, self.purchase_price)
    }
}

/// Packing unit definition for a new or updated item.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPackingUnit {
    /// Unit name.
    pub name: String,
    /// Base units per packing unit.
    pub factor: Decimal,
}

/// Input for `add_item`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewItem {
    /// Display name.
    pub name: String,
    /// Base unit name.
    pub base_unit: String,
    /// Packing units.
    #[serde(default)]
    pub units: Vec<NewPackingUnit>,
    /// Purchase price per base unit.
    pub purchase_price: Decimal,
    /// Sale price per base unit.
    pub sale_price: Decimal,
    /// Stock on hand when the item is created, in base units.
    #[serde(default)]
    pub opening_stock: Decimal,
    /// Category label.
    #[serde(default)]
    pub category: Option<String>,
    /// Barcode.
    #[serde(default)]
    pub barcode: Option<String>,
}

/// Editable item fields. Stock is never patched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemPatch {
    /// New name.
    pub name: Option<String>,
    /// New purchase price per base unit.
    pub purchase_price: Option<Decimal>,
    /// New sale price per base unit.
    pub sale_price: Option<Decimal>,
    /// New category.
    pub category: Option<String>,
    /// New barcode.
    pub barcode: Option<String>,
    /// Packing units to add.
    #[serde(default)]
    pub add_units: Vec<NewPackingUnit>,
}

/// Signed stock movement in base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDelta {
    /// The item.
    pub item_id: ItemId,
    /// Base units; positive for inflow.
    pub quantity: Decimal,
}

impl StockDelta {
    /// The opposite movement.
    #[must_use]
    pub fn negated(self) -> Self {
        Self {
            item_id: self.item_id,
            quantity: -self.quantity,
        }
    }
}
