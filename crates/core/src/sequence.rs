//! Sequence generator for human-readable identifiers.
//!
//! One counter per entity type. Values start at 1, strictly increase, and are
//! never handed out twice for the lifetime of the books, archived records included.

use std::sync::atomic::{AtomicU64, Ordering};

use mizan_shared::types::{
    AccountId, AdjustmentId, CustomerId, ItemId, JournalEntryId, PackingUnitId, PurchaseId,
    PurchaseReturnId, SaleId, SaleReturnId, SequentialId, SupplierId, TreasuryId,
};

/// Entity types that draw identifiers from the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Chart of accounts entries.
    Account,
    /// Journal entries.
    JournalEntry,
    /// Sale invoices.
    Sale,
    /// Purchase invoices.
    Purchase,
    /// Sale returns.
    SaleReturn,
    /// Purchase returns.
    PurchaseReturn,
    /// Inventory adjustments.
    Adjustment,
    /// Treasury vouchers.
    Treasury,
    /// Customers.
    Customer,
    /// Suppliers.
    Supplier,
    /// Inventory items.
    Item,
    /// Packing units.
    PackingUnit,
}

impl EntityKind {
    const COUNT: usize = 12;
}

/// A typed ID that is allocated by the [`SequenceGenerator`].
pub trait Sequenced: SequentialId + Ord + std::fmt::Debug {
    /// Counter this ID type draws from.
    const KIND: EntityKind;
}

macro_rules! sequenced {
    ($($id:ty => $kind:ident),* $(,)?) => {
        $(
            impl Sequenced for $id {
                const KIND: EntityKind = EntityKind::$kind;
            }
        )*
    };
}

sequenced! {
    AccountId => Account,
    JournalEntryId => JournalEntry,
    SaleId => Sale,
    PurchaseId => Purchase,
    SaleReturnId => SaleReturn,
    PurchaseReturnId => PurchaseReturn,
    AdjustmentId => Adjustment,
    TreasuryId => Treasury,
    CustomerId => Customer,
    SupplierId => Supplier,
    ItemId => Item,
    PackingUnitId => PackingUnit,
}

/// Per-entity monotonic counters.
///
/// Each counter is an atomic increment, so allocation stays unique even if the
/// generator is shared between threads.
#[derive(Debug)]
pub struct SequenceGenerator {
    counters: [AtomicU64; EntityKind::COUNT],
}

impl Default for SequenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceGenerator {
    /// Creates a generator with every counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            counters: [const { AtomicU64::new(0) }; EntityKind::COUNT],
        }
    }

    /// Allocates the next ID of type `I`.
    pub fn next<I: Sequenced>(&self) -> I {
        let seq = self.counters[I::KIND as usize].fetch_add(1, Ordering::Relaxed) + 1;
        I::from_seq(seq)
    }

    /// Returns the last value handed out for `kind` (0 if none).
    #[must_use]
    pub fn last(&self, kind: EntityKind) -> u64 {
        self.counters[kind as usize].load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_ids_start_at_one_and_increase() {
        let seq = SequenceGenerator::new();
        let first: SaleId = seq.next();
        let second: SaleId = seq.next();
        assert_eq!(first, SaleId::new(1));
        assert_eq!(second, SaleId::new(2));
        assert_eq!(seq.last(EntityKind::Sale), 2);
    }

    #[test]
    fn test_counters_are_independent_per_kind() {
        let seq = SequenceGenerator::new();
        let _: SaleId = seq.next();
        let _: SaleId = seq.next();
        let purchase: PurchaseId = seq.next();
        assert_eq!(purchase, PurchaseId::new(1));
        assert_eq!(seq.last(EntityKind::JournalEntry), 0);
    }

    #[test]
    fn test_concurrent_allocation_is_unique() {
        let seq = Arc::new(SequenceGenerator::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let seq = Arc::clone(&seq);
                std::thread::spawn(move || {
                    (0..250).map(|_| seq.next::<JournalEntryId>()).collect::<Vec<_>>()
                })
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), 2000);
        assert_eq!(seq.last(EntityKind::JournalEntry), 2000);
    }
}
