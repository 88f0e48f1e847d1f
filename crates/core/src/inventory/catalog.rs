//! Item and unit catalogue with stock keeping.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use mizan_shared::types::{ItemId, MoneyError};

use super::types::{InventoryItem, ItemPatch, NewItem, NewPackingUnit, PackingUnit, StockDelta};
use crate::error::LedgerError;
use crate::sequence::SequenceGenerator;

const ENTITY: &str = "Item";

/// Inventory ledger: the unit catalogue and every item's stock.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    unit_names: Vec<String>,
    items: BTreeMap<ItemId, InventoryItem>,
    allow_negative_stock: bool,
}

impl Inventory {
    /// Creates an empty inventory.
    #[must_use]
    pub fn new(allow_negative_stock: bool) -> Self {
        Self {
            allow_negative_stock,
            ..Self::default()
        }
    }

    /// Returns true if stock may go below zero.
    #[must_use]
    pub fn allows_negative_stock(&self) -> bool {
        self.allow_negative_stock
    }

    /// Registers a unit name. Names are unique ignoring case.
    pub fn add_unit_definition(&mut self, name: &str) -> Result<&str, LedgerError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LedgerError::MissingField("unit name"));
        }
        if self.find_unit(name).is_some() {
            return Err(LedgerError::DuplicateUnit(name.to_string()));
        }
        self.unit_names.push(name.to_string());
        Ok(&self.unit_names[self.unit_names.len() - 1])
    }

    /// Registered unit names in insertion order.
    #[must_use]
    pub fn unit_names(&self) -> &[String] {
        &self.unit_names
    }

    /// Creates an item, allocating ids for it and its packing units.
    pub fn add_item(
        &mut self,
        sequence: &SequenceGenerator,
        input: NewItem,
    ) -> Result<&InventoryItem, LedgerError> {
        let name = required(&input.name, "name")?;
        let base_unit = self.registered_unit(&input.base_unit)?;
        check_price(input.purchase_price)?;
        check_price(input.sale_price)?;
        if input.opening_stock < Decimal::ZERO {
            return Err(MoneyError::Negative(input.opening_stock).into());
        }
        let units = self.check_units(&input.units)?;

        let id = sequence.next::<ItemId>();
        let mut item = InventoryItem {
            id,
            name,
            base_unit,
            units: units
                .into_iter()
                .map(|(name, factor)| PackingUnit {
                    id: sequence.next(),
                    name,
                    factor,
                    purchase_price: Decimal::ZERO,
                    sale_price: Decimal::ZERO,
                })
                .collect(),
            purchase_price: input.purchase_price,
            sale_price: input.sale_price,
            stock: input.opening_stock,
            category: input.category,
            barcode: input.barcode,
            is_archived: false,
        };
        item.reprice_units()?;
        self.items.insert(id, item);
        self.get(id)
    }

    /// Applies a patch to an active item and reprices its packing units.
    pub fn update_item(
        &mut self,
        sequence: &SequenceGenerator,
        id: ItemId,
        patch: ItemPatch,
    ) -> Result<&InventoryItem, LedgerError> {
        self.require_active(id)?;
        let name = patch
            .name
            .as_deref()
            .map(|n| required(n, "name"))
            .transpose()?;
        if let Some(price) = patch.purchase_price {
            check_price(price)?;
        }
        if let Some(price) = patch.sale_price {
            check_price(price)?;
        }
        let new_units = self.check_units(&patch.add_units)?;
        let item = self.get(id)?;
        for (unit_name, _) in &new_units {
            if item.units.iter().any(|u| u.name == *unit_name) {
                return Err(LedgerError::DuplicateUnit(unit_name.clone()));
            }
        }

        let mut item = item.clone();
        if let Some(name) = name {
            item.name = name;
        }
        if let Some(price) = patch.purchase_price {
            item.purchase_price = price;
        }
        if let Some(price) = patch.sale_price {
            item.sale_price = price;
        }
        if patch.category.is_some() {
            item.category = patch.category;
        }
        if patch.barcode.is_some() {
            item.barcode = patch.barcode;
        }
        for (name, factor) in new_units {
            item.units.push(PackingUnit {
                id: sequence.next(),
                name,
                factor,
                purchase_price: Decimal::ZERO,
                sale_price: Decimal::ZERO,
            });
        }
        item.reprice_units()?;
        self.items.insert(id, item);
        self.get(id)
    }

    /// Archives an item with no stock on hand.
    pub fn archive_item(&mut self, id: ItemId) -> Result<&InventoryItem, LedgerError> {
        let item = self.get(id)?;
        if item.is_archived {
            return Err(LedgerError::already_archived(ENTITY, id));
        }
        if !item.stock.is_zero() {
            return Err(LedgerError::ItemHasStock {
                item: id,
                stock: item.stock,
            });
        }
        let item = self.get_mut(id)?;
        item.is_archived = true;
        Ok(&*item)
    }

    /// Looks up an item.
    pub fn get(&self, id: ItemId) -> Result<&InventoryItem, LedgerError> {
        self.items
            .get(&id)
            .ok_or_else(|| LedgerError::not_found(ENTITY, id))
    }

    /// Looks up an item that can appear on new documents.
    pub fn require_active(&self, id: ItemId) -> Result<&InventoryItem, LedgerError> {
        let item = self.get(id)?;
        if item.is_archived {
            return Err(LedgerError::entity_archived(ENTITY, id));
        }
        Ok(item)
    }

    /// Checks that applying `deltas` keeps every item's stock non-negative.
    ///
    /// Deltas are netted per item first, so an update that returns and re-issues
    /// the same goods is judged on its net movement.
    pub fn check_stock_deltas(&self, deltas: &[StockDelta]) -> Result<(), LedgerError> {
        for (item_id, net) in net_by_item(deltas)? {
            let item = self.get(item_id)?;
            let after = item.stock.checked_add(net).ok_or(MoneyError::OutOfRange)?;
            if self.allow_negative_stock || !net.is_sign_negative() {
                continue;
            }
            if after < Decimal::ZERO {
                return Err(LedgerError::InsufficientStock {
                    item: item_id,
                    available: item.stock,
                    requested: -net,
                });
            }
        }
        Ok(())
    }

    /// Applies stock movements, netted per item. Callers check them first.
    pub fn apply_stock_deltas(&mut self, deltas: &[StockDelta]) -> Result<(), LedgerError> {
        for (item_id, net) in net_by_item(deltas)? {
            let item = self.get_mut(item_id)?;
            item.stock = item.stock.checked_add(net).ok_or(MoneyError::OutOfRange)?;
        }
        Ok(())
    }

    /// Total cost of stock on hand.
    pub fn valuation(&self) -> Result<Decimal, MoneyError> {
        self.items.values().try_fold(Decimal::ZERO, |total, item| {
            total
                .checked_add(item.stock_value()?)
                .ok_or(MoneyError::OutOfRange)
        })
    }

    /// All items in id order.
    pub fn iter(&self) -> impl Iterator<Item = &InventoryItem> {
        self.items.values()
    }

    fn get_mut(&mut self, id: ItemId) -> Result<&mut InventoryItem, LedgerError> {
        self.items
            .get_mut(&id)
            .ok_or_else(|| LedgerError::not_found(ENTITY, id))
    }

    fn find_unit(&self, name: &str) -> Option<&String> {
        self.unit_names
            .iter()
            .find(|u| u.to_lowercase() == name.to_lowercase())
    }

    fn registered_unit(&self, name: &str) -> Result<String, LedgerError> {
        let name = required(name, "unit")?;
        self.find_unit(&name)
            .cloned()
            .ok_or(LedgerError::UnknownUnit(name))
    }

    fn check_units(&self, units: &[NewPackingUnit]) -> Result<Vec<(String, Decimal)>, LedgerError> {
        let mut checked: Vec<(String, Decimal)> = Vec::with_capacity(units.len());
        for unit in units {
            let name = self.registered_unit(&unit.name)?;
            if unit.factor <= Decimal::ZERO {
                return Err(LedgerError::InvalidFactor);
            }
            if checked.iter().any(|(n, _)| *n == name) {
                return Err(LedgerError::DuplicateUnit(name));
            }
            checked.push((name, unit.factor));
        }
        Ok(checked)
    }
}

fn net_by_item(deltas: &[StockDelta]) -> Result<BTreeMap<ItemId, Decimal>, MoneyError> {
    let mut net = BTreeMap::new();
    for delta in deltas {
        let total = net.entry(delta.item_id).or_insert(Decimal::ZERO);
        *total = total
            .checked_add(delta.quantity)
            .ok_or(MoneyError::OutOfRange)?;
    }
    Ok(net)
}

fn required(value: &str, field: &'static str) -> Result<String, LedgerError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LedgerError::MissingField(field));
    }
    Ok(value.to_string())
}

fn check_price(price: Decimal) -> Result<(), LedgerError> {
    if price < Decimal::ZERO {
        return Err(LedgerError::NegativePrice);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::UnitRef;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn inventory(allow_negative: bool) -> Inventory {
        let mut inventory = Inventory::new(allow_negative);
        inventory.add_unit_definition("kg").unwrap();
        inventory.add_unit_definition("sack").unwrap();
        inventory
    }

    fn rice() -> NewItem {
        NewItem {
            name: "Rice".to_string(),
            base_unit: "kg".to_string(),
            units: vec![NewPackingUnit {
                name: "sack".to_string(),
                factor: dec!(25),
            }],
            purchase_price: dec!(2),
            sale_price: dec!(3),
            opening_stock: dec!(10),
            ..NewItem::default()
        }
    }

    #[test]
    fn test_duplicate_unit_ignores_case() {
        let mut inventory = inventory(false);
        assert!(matches!(
            inventory.add_unit_definition("KG"),
            Err(LedgerError::DuplicateUnit(_))
        ));
        assert!(matches!(
            inventory.add_unit_definition("  "),
            Err(LedgerError::MissingField(_))
        ));
        assert_eq!(inventory.unit_names().len(), 2);
    }

    #[test]
    fn test_add_item_prices_packing_units() {
        let sequence = SequenceGenerator::new();
        let mut inventory = inventory(false);
        let item = inventory.add_item(&sequence, rice()).unwrap();

        assert_eq!(item.stock, dec!(10));
        assert_eq!(item.units[0].purchase_price, dec!(50));
        assert_eq!(item.units[0].sale_price, dec!(75));
        let sack = UnitRef::Packing(item.units[0].id);
        assert_eq!(item.base_quantity(sack, dec!(3)).unwrap(), dec!(75));
        assert_eq!(item.unit_name(sack).unwrap(), "sack");
    }

    #[test]
    fn test_add_item_requires_registered_units() {
        let sequence = SequenceGenerator::new();
        let mut inventory = inventory(false);
        let mut input = rice();
        input.base_unit = "litre".to_string();
        assert!(matches!(
            inventory.add_item(&sequence, input),
            Err(LedgerError::UnknownUnit(_))
        ));
        assert_eq!(inventory.iter().count(), 0);
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-2))]
    fn test_add_item_rejects_bad_factor(#[case] factor: Decimal) {
        let sequence = SequenceGenerator::new();
        let mut inventory = inventory(false);
        let mut input = rice();
        input.units[0].factor = factor;
        assert!(matches!(
            inventory.add_item(&sequence, input),
            Err(LedgerError::InvalidFactor)
        ));
    }

    #[test]
    fn test_update_item_reprices_units() {
        let sequence = SequenceGenerator::new();
        let mut inventory = inventory(false);
        let id = inventory.add_item(&sequence, rice()).unwrap().id;

        let item = inventory
            .update_item(
                &sequence,
                id,
                ItemPatch {
                    purchase_price: Some(dec!(2.4)),
                    ..ItemPatch::default()
                },
            )
            .unwrap();
        assert_eq!(item.units[0].purchase_price, dec!(60.0));
        assert_eq!(item.units[0].sale_price, dec!(75));
        assert_eq!(item.stock, dec!(10));
    }

    #[test]
    fn test_update_item_rejects_negative_price() {
        let sequence = SequenceGenerator::new();
        let mut inventory = inventory(false);
        let id = inventory.add_item(&sequence, rice()).unwrap().id;
        let patch = ItemPatch {
            sale_price: Some(dec!(-1)),
            ..ItemPatch::default()
        };
        assert!(matches!(
            inventory.update_item(&sequence, id, patch),
            Err(LedgerError::NegativePrice)
        ));
        assert_eq!(inventory.get(id).unwrap().sale_price, dec!(3));
    }

    #[test]
    fn test_stock_check_nets_per_item() {
        let sequence = SequenceGenerator::new();
        let mut inventory = inventory(false);
        let id = inventory.add_item(&sequence, rice()).unwrap().id;

        let deltas = [
            StockDelta { item_id: id, quantity: dec!(-12) },
            StockDelta { item_id: id, quantity: dec!(5) },
        ];
        assert!(inventory.check_stock_deltas(&deltas).is_ok());

        let err = inventory
            .check_stock_deltas(&[StockDelta { item_id: id, quantity: dec!(-11) }])
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::InsufficientStock { available, requested, .. }
                if available == dec!(10) && requested == dec!(11)
        ));
    }

    #[test]
    fn test_negative_stock_allowed_by_setting() {
        let sequence = SequenceGenerator::new();
        let mut inventory = inventory(true);
        let id = inventory.add_item(&sequence, rice()).unwrap().id;
        let deltas = [StockDelta { item_id: id, quantity: dec!(-15) }];
        inventory.check_stock_deltas(&deltas).unwrap();
        inventory.apply_stock_deltas(&deltas).unwrap();
        assert_eq!(inventory.get(id).unwrap().stock, dec!(-5));
    }

    #[test]
    fn test_archive_item_requires_zero_stock() {
        let sequence = SequenceGenerator::new();
        let mut inventory = inventory(false);
        let id = inventory.add_item(&sequence, rice()).unwrap().id;
        assert!(matches!(
            inventory.archive_item(id),
            Err(LedgerError::ItemHasStock { .. })
        ));

        inventory
            .apply_stock_deltas(&[StockDelta { item_id: id, quantity: dec!(-10) }])
            .unwrap();
        inventory.archive_item(id).unwrap();
        assert!(matches!(
            inventory.require_active(id),
            Err(LedgerError::EntityArchived { .. })
        ));
        assert!(matches!(
            inventory.archive_item(id),
            Err(LedgerError::AlreadyArchived { .. })
        ));
    }

    #[test]
    fn test_valuation() {
        let sequence = SequenceGenerator::new();
        let mut inventory = inventory(false);
        inventory.add_item(&sequence, rice()).unwrap();
        assert_eq!(inventory.valuation().unwrap(), dec!(20));
    }

    #[test]
    fn test_update_item_rejects_overflowing_price() {
        let sequence = SequenceGenerator::new();
        let mut inventory = inventory(false);
        let id = inventory.add_item(&sequence, rice()).unwrap().id;
        let before = inventory.get(id).unwrap().clone();

        let err = inventory
            .update_item(
                &sequence,
                id,
                ItemPatch {
                    name: Some("Basmati".to_string()),
                    purchase_price: Some(Decimal::MAX),
                    ..ItemPatch::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::Money(MoneyError::OutOfRange)));
        assert_eq!(inventory.get(id).unwrap(), &before);
    }
}
