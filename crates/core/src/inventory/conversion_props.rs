//! Property-based tests for unit conversion.
//!
//! A quantity in a packing unit with factor `f` always moves `quantity × f` base
//! units of stock.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::catalog::Inventory;
use super::types::{NewItem, NewPackingUnit, StockDelta, UnitRef};
use crate::sequence::SequenceGenerator;

fn positive_decimal() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64, 0u32..4).prop_map(|(n, scale)| Decimal::new(n, scale))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_packing_quantity_moves_factor_times_base_units(
        factor in positive_decimal(),
        quantity in positive_decimal(),
        opening in positive_decimal(),
    ) {
        let sequence = SequenceGenerator::new();
        let mut inventory = Inventory::new(false);
        inventory.add_unit_definition("piece").unwrap();
        inventory.add_unit_definition("box").unwrap();
        let item = inventory
            .add_item(
                &sequence,
                NewItem {
                    name: "Widget".to_string(),
                    base_unit: "piece".to_string(),
                    units: vec![NewPackingUnit { name: "box".to_string(), factor }],
                    opening_stock: opening,
                    ..NewItem::default()
                },
            )
            .unwrap();
        let id = item.id;
        let unit = UnitRef::Packing(item.units[0].id);

        let base = item.base_quantity(unit, quantity).unwrap();
        prop_assert_eq!(base, quantity * factor);

        inventory
            .apply_stock_deltas(&[StockDelta { item_id: id, quantity: base }])
            .unwrap();
        prop_assert_eq!(inventory.get(id).unwrap().stock, opening + quantity * factor);
    }

    #[test]
    fn prop_base_unit_is_identity(quantity in positive_decimal()) {
        let sequence = SequenceGenerator::new();
        let mut inventory = Inventory::new(false);
        inventory.add_unit_definition("kg").unwrap();
        let item = inventory
            .add_item(
                &sequence,
                NewItem {
                    name: "Flour".to_string(),
                    base_unit: "kg".to_string(),
                    ..NewItem::default()
                },
            )
            .unwrap();
        prop_assert_eq!(item.base_quantity(UnitRef::Base, quantity).unwrap(), quantity);
    }
}
