//! Sales, purchases, and returns.
//!
//! The four document types share one pipeline, parameterised by [`TradeKind`]:
//! build the terms, derive the effect, check stock and journal lines, then apply.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::info;

use mizan_shared::types::{JournalEntryId, checked_product, checked_sum};

use super::{Action, Books, rejected};
use crate::error::LedgerError;
use crate::inventory::StockDelta;
use crate::journal::{EntryHeader, Journal};
use crate::party::PartyLedger;
use crate::trade::{
    Effect, LineItem, LineItemInput, Purchase, PurchaseInput, PurchaseKind, PurchaseReturn,
    PurchaseReturnInput, PurchaseReturnKind, Sale, SaleInput, SaleKind, SaleReturn,
    SaleReturnInput, SaleReturnKind, Settlement, TradeDocument, TradeInput, TradeKind, TradeTerms,
};

/// Where the books keep each document type.
pub(crate) trait TradeBook: TradeKind {
    fn documents(books: &Books) -> &BTreeMap<Self::Id, TradeDocument<Self>>;
    fn documents_mut(books: &mut Books) -> &mut BTreeMap<Self::Id, TradeDocument<Self>>;
    fn parties(books: &Books) -> &PartyLedger<Self::PartyId>;
}

macro_rules! trade_book {
    ($kind:ty, $field:ident, $parties:ident) => {
        impl TradeBook for $kind {
            fn documents(books: &Books) -> &BTreeMap<Self::Id, TradeDocument<Self>> {
                &books.$field
            }

            fn documents_mut(books: &mut Books) -> &mut BTreeMap<Self::Id, TradeDocument<Self>> {
                &mut books.$field
            }

            fn parties(books: &Books) -> &PartyLedger<Self::PartyId> {
                &books.$parties
            }
        }
    };
}

trade_book!(SaleKind, sales, customers);
trade_book!(PurchaseKind, purchases, suppliers);
trade_book!(SaleReturnKind, sale_returns, customers);
trade_book!(PurchaseReturnKind, purchase_returns, suppliers);

macro_rules! trade_operations {
    (
        $kind:ty, $doc:ty, $input:ty,
        $add:ident, $update:ident, $archive:ident, $unarchive:ident, $what:literal
    ) => {
        impl Books {
            #[doc = concat!("Records a ", $what, ", posting its journal entry and moving stock and party balance.")]
            pub fn $add(&mut self, input: $input) -> Result<&$doc, LedgerError> {
                let id = self
                    .create_trade::<$kind>(input)
                    .inspect_err(|e| rejected(stringify!($add), e))?;
                self.trade::<$kind>(id)
            }

            #[doc = concat!("Replaces an active ", $what, ", as if it were archived and recreated under the same id.")]
            pub fn $update(
                &mut self,
                id: <$kind as TradeKind>::Id,
                input: $input,
            ) -> Result<&$doc, LedgerError> {
                self.update_trade::<$kind>(id, input)
                    .inspect_err(|e| rejected(stringify!($update), e))?;
                self.trade::<$kind>(id)
            }

            #[doc = concat!("Archives a ", $what, ", reversing its journal entry and its stock and party movements.")]
            pub fn $archive(&mut self, id: <$kind as TradeKind>::Id) -> Result<&$doc, LedgerError> {
                self.archive_trade::<$kind>(id)
                    .inspect_err(|e| rejected(stringify!($archive), e))?;
                self.trade::<$kind>(id)
            }

            #[doc = concat!("Restores an archived ", $what, ", re-applying its exact original effect.")]
            pub fn $unarchive(&mut self, id: <$kind as TradeKind>::Id) -> Result<&$doc, LedgerError> {
                self.unarchive_trade::<$kind>(id)
                    .inspect_err(|e| rejected(stringify!($unarchive), e))?;
                self.trade::<$kind>(id)
            }
        }
    };
}

trade_operations!(SaleKind, Sale, SaleInput, add_sale, update_sale, archive_sale, unarchive_sale, "sale");
trade_operations!(
    PurchaseKind,
    Purchase,
    PurchaseInput,
    add_purchase,
    update_purchase,
    archive_purchase,
    unarchive_purchase,
    "purchase"
);
trade_operations!(
    SaleReturnKind,
    SaleReturn,
    SaleReturnInput,
    add_sale_return,
    update_sale_return,
    archive_sale_return,
    unarchive_sale_return,
    "sale return"
);
trade_operations!(
    PurchaseReturnKind,
    PurchaseReturn,
    PurchaseReturnInput,
    add_purchase_return,
    update_purchase_return,
    archive_purchase_return,
    unarchive_purchase_return,
    "purchase return"
);

impl Books {
    /// Validates document lines against the inventory and prices them.
    ///
    /// Returns the lines with base quantities and current unit costs, plus the
    /// document total.
    pub(super) fn resolve_line_items(
        &self,
        inputs: &[LineItemInput],
    ) -> Result<(Vec<LineItem>, Decimal), LedgerError> {
        if inputs.is_empty() {
            return Err(LedgerError::NoLineItems);
        }
        let mut lines = Vec::with_capacity(inputs.len());
        for input in inputs {
            let item = self.inventory.require_active(input.item_id)?;
            if input.quantity <= Decimal::ZERO {
                return Err(LedgerError::NonPositiveQuantity { item: item.id });
            }
            if input.price < Decimal::ZERO {
                return Err(LedgerError::NegativePrice);
            }
            let base_quantity = item.base_quantity(input.unit, input.quantity)?;
            checked_product(base_quantity, item.purchase_price)?;
            lines.push(LineItem {
                item_id: item.id,
                item_name: item.name.clone(),
                unit: input.unit,
                unit_name: item.unit_name(input.unit)?.to_string(),
                quantity: input.quantity,
                price: input.price,
                total: checked_product(input.quantity, input.price)?,
                base_quantity,
                unit_cost: item.purchase_price,
            });
        }
        let total = checked_sum(lines.iter().map(|l| l.total))?;
        // A sale debits the total and the cost in one entry.
        let cost = checked_sum(lines.iter().map(LineItem::cost))?;
        checked_sum([total, cost])?;
        if total <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount);
        }
        Ok((lines, total))
    }

    fn trade<K: TradeBook>(&self, id: K::Id) -> Result<&TradeDocument<K>, LedgerError> {
        K::documents(self)
            .get(&id)
            .ok_or_else(|| LedgerError::not_found(K::KIND.entity(), id))
    }

    fn build_terms<K: TradeBook>(
        &self,
        input: TradeInput<K::PartyId>,
    ) -> Result<TradeTerms<K::PartyId>, LedgerError> {
        let settlement = match input.settlement {
            Settlement::OnAccount => {
                if input.party.is_none() {
                    return Err(LedgerError::MissingField(K::KIND.party_field()));
                }
                Settlement::OnAccount
            }
            Settlement::Cash { treasury } => {
                let treasury = treasury.unwrap_or(self.roles.default_treasury);
                self.require_treasury(treasury)?;
                Settlement::Cash {
                    treasury: Some(treasury),
                }
            }
        };
        if let Some(party) = input.party {
            K::parties(self).require_active(party)?;
        }
        let (lines, total) = self.resolve_line_items(&input.lines)?;

        Ok(TradeTerms {
            date: input.date,
            party: input.party,
            settlement,
            lines,
            total,
            notes: input.notes,
        })
    }

    fn header<K: TradeKind>(&self, id: K::Id, terms: &TradeTerms<K::PartyId>) -> EntryHeader {
        let description = if terms.notes.is_empty() {
            format!("{} {id}", K::KIND.entity())
        } else {
            format!("{} {id}: {}", K::KIND.entity(), terms.notes)
        };
        EntryHeader {
            date: terms.date,
            description,
            source: K::source(id),
        }
    }

    fn create_trade<K: TradeBook>(
        &mut self,
        input: TradeInput<K::PartyId>,
    ) -> Result<K::Id, LedgerError> {
        let terms = self.build_terms::<K>(input)?;
        let effect = Effect::trade::<K>(&terms, &self.roles);
        self.inventory.check_stock_deltas(&effect.stock)?;
        let prepared = Journal::prepare(&self.chart, &effect.lines)?;

        let id: K::Id = self.sequence.next();
        let entry_id: JournalEntryId = self.sequence.next();
        let header = self.header::<K>(id, &terms);
        self.journal.commit(&mut self.chart, entry_id, header, prepared)?;
        self.inventory.apply_stock_deltas(&effect.stock)?;
        if let Some(delta) = effect.party {
            self.apply_party(delta)?;
        }

        let total = terms.total;
        K::documents_mut(self).insert(
            id,
            TradeDocument {
                id,
                journal_entry_id: entry_id,
                terms,
                is_archived: false,
            },
        );
        info!(document = %id, entry = %entry_id, total = %total, "{} created", K::KIND.entity());
        self.record(Action::Created, K::KIND.entity(), id, format!("total {total}"));
        Ok(id)
    }

    fn update_trade<K: TradeBook>(
        &mut self,
        id: K::Id,
        input: TradeInput<K::PartyId>,
    ) -> Result<(), LedgerError> {
        let old = self.trade::<K>(id)?;
        if old.is_archived {
            return Err(LedgerError::entity_archived(K::KIND.entity(), id));
        }
        let old_entry = old.journal_entry_id;
        let old_effect = Effect::trade::<K>(&old.terms, &self.roles);

        let terms = self.build_terms::<K>(input)?;
        let new_effect = Effect::trade::<K>(&terms, &self.roles);
        let stock: Vec<StockDelta> = old_effect
            .negated_stock()
            .into_iter()
            .chain(new_effect.stock.iter().copied())
            .collect();
        self.inventory.check_stock_deltas(&stock)?;
        self.journal.check_reversal(&self.chart, old_entry)?;
        let prepared = Journal::prepare(&self.chart, &new_effect.lines)?;

        self.journal.reverse(&mut self.chart, old_entry)?;
        let entry_id: JournalEntryId = self.sequence.next();
        let header = self.header::<K>(id, &terms);
        self.journal.commit(&mut self.chart, entry_id, header, prepared)?;
        self.inventory.apply_stock_deltas(&stock)?;
        if let Some(delta) = old_effect.party {
            self.apply_party(delta.negated())?;
        }
        if let Some(delta) = new_effect.party {
            self.apply_party(delta)?;
        }

        let total = terms.total;
        if let Some(document) = K::documents_mut(self).get_mut(&id) {
            document.terms = terms;
            document.journal_entry_id = entry_id;
        }
        info!(document = %id, entry = %entry_id, total = %total, "{} updated", K::KIND.entity());
        self.record(Action::Updated, K::KIND.entity(), id, format!("total {total}"));
        Ok(())
    }

    fn archive_trade<K: TradeBook>(&mut self, id: K::Id) -> Result<(), LedgerError> {
        let document = self.trade::<K>(id)?;
        if document.is_archived {
            return Err(LedgerError::already_archived(K::KIND.entity(), id));
        }
        let entry_id = document.journal_entry_id;
        let effect = Effect::trade::<K>(&document.terms, &self.roles);
        let stock = effect.negated_stock();
        self.inventory.check_stock_deltas(&stock)?;
        self.journal.check_reversal(&self.chart, entry_id)?;

        self.journal.reverse(&mut self.chart, entry_id)?;
        self.inventory.apply_stock_deltas(&stock)?;
        if let Some(delta) = effect.party {
            self.apply_party(delta.negated())?;
        }
        if let Some(document) = K::documents_mut(self).get_mut(&id) {
            document.is_archived = true;
        }
        info!(document = %id, entry = %entry_id, "{} archived", K::KIND.entity());
        self.record(Action::Archived, K::KIND.entity(), id, "");
        Ok(())
    }

    fn unarchive_trade<K: TradeBook>(&mut self, id: K::Id) -> Result<(), LedgerError> {
        let document = self.trade::<K>(id)?;
        if !document.is_archived {
            return Err(LedgerError::not_archived(K::KIND.entity(), id));
        }
        let entry_id = document.journal_entry_id;
        let effect = Effect::trade::<K>(&document.terms, &self.roles);
        if let Some(delta) = effect.party {
            self.check_party(delta)?;
        }
        self.check_items_active(&effect.stock)?;
        self.inventory.check_stock_deltas(&effect.stock)?;
        self.journal.check_reinstatement(&self.chart, entry_id)?;

        self.journal.reinstate(&mut self.chart, entry_id)?;
        self.inventory.apply_stock_deltas(&effect.stock)?;
        if let Some(delta) = effect.party {
            self.apply_party(delta)?;
        }
        if let Some(document) = K::documents_mut(self).get_mut(&id) {
            document.is_archived = false;
        }
        info!(document = %id, entry = %entry_id, "{} unarchived", K::KIND.entity());
        self.record(Action::Unarchived, K::KIND.entity(), id, "");
        Ok(())
    }
}
