//! Property-based tests for the books facade.
//!
//! Archiving undoes a document exactly, rejected operations change nothing, and
//! the statements foot after any sequence of operations.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use mizan_shared::LedgerSettings;
use mizan_shared::types::{AccountId, CustomerId, ItemId, SupplierId};

use super::Books;
use crate::error::LedgerError;
use crate::inventory::{NewItem, UnitRef};
use crate::party::NewParty;
use crate::trade::{
    AdjustmentInput, AdjustmentKind, Counterparty, LineItemInput, PurchaseInput,
    PurchaseReturnInput, SaleInput, SaleReturnInput, Settlement, TransferInput, TreasuryInput,
    TreasuryKind,
};

/// Document kinds that can be archived.
#[derive(Debug, Clone, Copy)]
enum Doc {
    Sale,
    Purchase,
    SaleReturn,
    PurchaseReturn,
    Adjustment,
    Voucher,
}

#[derive(Debug, Clone)]
enum Op {
    Sale { quantity: Decimal, price: Decimal, cash: bool },
    Purchase { quantity: Decimal, price: Decimal },
    SaleReturn { quantity: Decimal, price: Decimal },
    PurchaseReturn { quantity: Decimal, price: Decimal },
    Adjustment { kind: AdjustmentKind, quantity: Decimal },
    Receipt(Decimal),
    Payment(Decimal),
    Transfer(Decimal),
    ArchiveLatest(Doc),
}

struct World {
    books: Books,
    item: ItemId,
    customer: CustomerId,
    supplier: SupplierId,
    cash: AccountId,
    bank: AccountId,
    shortage: AccountId,
}

impl World {
    fn new(opening_stock: Decimal) -> Self {
        let mut books = Books::new(LedgerSettings::default()).unwrap();
        books.add_unit_definition("kg").unwrap();
        let item = books
            .add_item(NewItem {
                name: "Flour".to_string(),
                base_unit: "kg".to_string(),
                purchase_price: Decimal::new(350, 2),
                sale_price: Decimal::new(500, 2),
                opening_stock,
                ..NewItem::default()
            })
            .unwrap()
            .id;
        let party = |name: &str| NewParty {
            name: name.to_string(),
            ..NewParty::default()
        };
        let customer = books.add_customer(party("Customer")).unwrap().id;
        let supplier = books.add_supplier(party("Supplier")).unwrap().id;
        let cash = books.roles().default_treasury;
        let bank = books.chart().find_by_code("1112").unwrap().id;
        let shortage = books.chart().find_by_code("424").unwrap().id;
        Self {
            books,
            item,
            customer,
            supplier,
            cash,
            bank,
            shortage,
        }
    }

    fn lines(&self, quantity: Decimal, price: Decimal) -> Vec<LineItemInput> {
        vec![LineItemInput {
            item_id: self.item,
            unit: UnitRef::Base,
            quantity,
            price,
        }]
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    fn voucher(&self, kind: TreasuryKind, counterparty: Counterparty, amount: Decimal) -> TreasuryInput {
        TreasuryInput {
            date: Self::date(),
            kind,
            treasury: self.cash,
            counterparty,
            amount,
            description: String::new(),
        }
    }

    /// Applies one operation. Archiving with nothing left to archive is a no-op.
    fn apply(&mut self, op: &Op) -> Result<(), LedgerError> {
        match *op {
            Op::Sale { quantity, price, cash } => {
                let settlement = if cash {
                    Settlement::Cash { treasury: None }
                } else {
                    Settlement::OnAccount
                };
                let input = SaleInput {
                    date: Self::date(),
                    party: Some(self.customer),
                    settlement,
                    lines: self.lines(quantity, price),
                    notes: String::new(),
                };
                self.books.add_sale(input)?;
            }
            Op::Purchase { quantity, price } => {
                let input = PurchaseInput {
                    date: Self::date(),
                    party: Some(self.supplier),
                    settlement: Settlement::OnAccount,
                    lines: self.lines(quantity, price),
                    notes: String::new(),
                };
                self.books.add_purchase(input)?;
            }
            Op::SaleReturn { quantity, price } => {
                let input = SaleReturnInput {
                    date: Self::date(),
                    party: Some(self.customer),
                    settlement: Settlement::OnAccount,
                    lines: self.lines(quantity, price),
                    notes: String::new(),
                };
                self.books.add_sale_return(input)?;
            }
            Op::PurchaseReturn { quantity, price } => {
                let input = PurchaseReturnInput {
                    date: Self::date(),
                    party: Some(self.supplier),
                    settlement: Settlement::OnAccount,
                    lines: self.lines(quantity, price),
                    notes: String::new(),
                };
                self.books.add_purchase_return(input)?;
            }
            Op::Adjustment { kind, quantity } => {
                let input = AdjustmentInput {
                    date: Self::date(),
                    kind,
                    contra_account: self.shortage,
                    lines: self.lines(quantity, Decimal::new(350, 2)),
                    notes: String::new(),
                };
                self.books.add_inventory_adjustment(input)?;
            }
            Op::Receipt(amount) => {
                let counterparty = Counterparty::Customer(self.customer);
                let input = self.voucher(TreasuryKind::Receipt, counterparty, amount);
                self.books.add_treasury_transaction(input)?;
            }
            Op::Payment(amount) => {
                let counterparty = Counterparty::Supplier(self.supplier);
                let input = self.voucher(TreasuryKind::Payment, counterparty, amount);
                self.books.add_treasury_transaction(input)?;
            }
            Op::Transfer(amount) => {
                self.books.transfer_treasury_funds(TransferInput {
                    date: Self::date(),
                    from: self.cash,
                    to: self.bank,
                    amount,
                    note: String::new(),
                })?;
            }
            Op::ArchiveLatest(doc) => self.archive_latest(doc)?,
        }
        Ok(())
    }

    /// Archives the newest active document of a kind, if there is one.
    fn archive_latest(&mut self, doc: Doc) -> Result<(), LedgerError> {
        let books = &mut self.books;
        match doc {
            Doc::Sale => match latest(books.sales().values().map(|d| (d.id, d.is_archived))) {
                Some(id) => books.archive_sale(id).map(|_| ()),
                None => Ok(()),
            },
            Doc::Purchase => match latest(books.purchases().values().map(|d| (d.id, d.is_archived))) {
                Some(id) => books.archive_purchase(id).map(|_| ()),
                None => Ok(()),
            },
            Doc::SaleReturn => match latest(books.sale_returns().values().map(|d| (d.id, d.is_archived))) {
                Some(id) => books.archive_sale_return(id).map(|_| ()),
                None => Ok(()),
            },
            Doc::PurchaseReturn => {
                match latest(books.purchase_returns().values().map(|d| (d.id, d.is_archived))) {
                    Some(id) => books.archive_purchase_return(id).map(|_| ()),
                    None => Ok(()),
                }
            }
            Doc::Adjustment => match latest(books.adjustments().values().map(|a| (a.id, a.is_archived))) {
                Some(id) => books.archive_inventory_adjustment(id).map(|_| ()),
                None => Ok(()),
            },
            Doc::Voucher => match latest(books.treasury().values().map(|v| (v.id, v.is_archived))) {
                Some(id) => books.archive_treasury_transaction(id).map(|_| ()),
                None => Ok(()),
            },
        }
    }

    fn snapshot(&self) -> (Vec<Decimal>, Decimal, Decimal, Decimal) {
        (
            self.books.chart().iter().map(|a| a.balance).collect(),
            self.books.item(self.item).unwrap().stock,
            self.books.customers().get(self.customer).unwrap().balance,
            self.books.suppliers().get(self.supplier).unwrap().balance,
        )
    }
}

/// The newest id that is not archived, given ids in ascending order.
fn latest<Id>(documents: impl DoubleEndedIterator<Item = (Id, bool)>) -> Option<Id> {
    documents.rev().find(|(_, archived)| !archived).map(|(id, _)| id)
}

fn quantity() -> impl Strategy<Value = Decimal> {
    (1i64..40).prop_map(Decimal::from)
}

fn price() -> impl Strategy<Value = Decimal> {
    (1i64..100_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn adjustment_kind() -> impl Strategy<Value = AdjustmentKind> {
    prop_oneof![Just(AdjustmentKind::Addition), Just(AdjustmentKind::Deduction)]
}

fn doc() -> impl Strategy<Value = Doc> {
    prop_oneof![
        Just(Doc::Sale),
        Just(Doc::Purchase),
        Just(Doc::SaleReturn),
        Just(Doc::PurchaseReturn),
        Just(Doc::Adjustment),
        Just(Doc::Voucher),
    ]
}

/// A document-creating operation paired with the kind that archives it.
fn document() -> impl Strategy<Value = (Op, Doc)> {
    prop_oneof![
        (quantity(), price(), any::<bool>())
            .prop_map(|(quantity, price, cash)| (Op::Sale { quantity, price, cash }, Doc::Sale)),
        (quantity(), price()).prop_map(|(quantity, price)| (Op::Purchase { quantity, price }, Doc::Purchase)),
        (quantity(), price())
            .prop_map(|(quantity, price)| (Op::SaleReturn { quantity, price }, Doc::SaleReturn)),
        (quantity(), price())
            .prop_map(|(quantity, price)| (Op::PurchaseReturn { quantity, price }, Doc::PurchaseReturn)),
        (adjustment_kind(), quantity())
            .prop_map(|(kind, quantity)| (Op::Adjustment { kind, quantity }, Doc::Adjustment)),
        price().prop_map(|amount| (Op::Receipt(amount), Doc::Voucher)),
        price().prop_map(|amount| (Op::Payment(amount), Doc::Voucher)),
        price().prop_map(|amount| (Op::Transfer(amount), Doc::Voucher)),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => document().prop_map(|(op, _)| op),
        1 => doc().prop_map(Op::ArchiveLatest),
    ]
}

proptest! {
    /// Archiving any document restores every balance it touched.
    #[test]
    fn prop_archive_round_trip((create, doc) in document()) {
        let mut world = World::new(Decimal::from(50));
        let before = world.snapshot();

        world.apply(&create).unwrap();
        prop_assert_ne!(world.snapshot(), before.clone());
        world.apply(&Op::ArchiveLatest(doc)).unwrap();

        prop_assert_eq!(world.snapshot(), before);
    }

    /// Archiving a document created on top of earlier trading undoes only that document.
    #[test]
    fn prop_archive_round_trip_after_history(
        history in prop::collection::vec(document(), 0..8),
        (create, doc) in document(),
    ) {
        let mut world = World::new(Decimal::from(400));
        for (op, _) in &history {
            let _ = world.apply(op);
        }
        let before = world.snapshot();

        if world.apply(&create).is_ok() {
            world.apply(&Op::ArchiveLatest(doc)).unwrap();
            prop_assert_eq!(world.snapshot(), before);
        }
    }

    /// A rejected operation leaves every balance as it was.
    #[test]
    fn prop_rejections_are_atomic(ops in prop::collection::vec(op(), 1..25)) {
        let mut world = World::new(Decimal::from(20));
        for op in &ops {
            let before = world.snapshot();
            if world.apply(op).is_err() {
                prop_assert_eq!(world.snapshot(), before);
            }
        }
    }

    /// The statements foot after any sequence of operations.
    #[test]
    fn prop_statements_foot(ops in prop::collection::vec(op(), 1..25)) {
        let mut world = World::new(Decimal::from(20));
        for op in &ops {
            let _ = world.apply(op);
        }

        let sheet = world.books.balance_sheet().unwrap();
        prop_assert!(
            sheet.is_balanced,
            "assets {} vs liabilities and equity {}",
            sheet.total_assets,
            sheet.liabilities_and_equity
        );
        prop_assert!(world.books.trial_balance().totals.is_balanced);
        prop_assert!(world.books.reconcile_parties().unwrap().is_reconciled);
        for entry in world.books.journal().iter() {
            prop_assert_eq!(entry.debit, entry.credit);
        }
        prop_assert!(world.books.item(world.item).unwrap().stock >= Decimal::ZERO);
    }
}
