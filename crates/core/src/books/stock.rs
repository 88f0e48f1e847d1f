//! Items, units, and inventory adjustments.

use chrono::NaiveDate;
use tracing::info;

use mizan_shared::types::{AccountId, AdjustmentId, ItemId, JournalEntryId};

use super::{Action, Books, rejected};
use crate::error::LedgerError;
use crate::inventory::{InventoryItem, ItemPatch, NewItem, StockDelta};
use crate::journal::{EntryHeader, Journal, JournalSource};
use crate::trade::{AdjustmentInput, Effect, InventoryAdjustment};

const ITEM: &str = "Item";
const ADJUSTMENT: &str = "Inventory adjustment";

impl Books {
    /// Registers a unit name for items to use.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for a blank name and `DuplicateUnit` if the name is
    /// already defined, ignoring case.
    pub fn add_unit_definition(&mut self, name: &str) -> Result<(), LedgerError> {
        self.try_add_unit(name)
            .inspect_err(|e| rejected("add_unit_definition", e))
    }

    fn try_add_unit(&mut self, name: &str) -> Result<(), LedgerError> {
        let unit = self.inventory.add_unit_definition(name)?.to_string();
        info!(unit = %unit, "Unit defined");
        self.record(Action::Created, "Unit", unit, "");
        Ok(())
    }

    /// Adds an item. Opening stock is set directly, outside the journal.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank name, an undefined unit, a bad
    /// packing factor, or a negative price or stock.
    pub fn add_item(&mut self, input: NewItem) -> Result<&InventoryItem, LedgerError> {
        let id = self
            .try_add_item(input)
            .inspect_err(|e| rejected("add_item", e))?;
        self.inventory.get(id)
    }

    fn try_add_item(&mut self, input: NewItem) -> Result<ItemId, LedgerError> {
        let item = self.inventory.add_item(&self.sequence, input)?;
        let (id, detail) = (item.id, item.name.clone());
        info!(item = %id, stock = %item.stock, "Item added");
        self.record(Action::Created, ITEM, id, detail);
        Ok(id)
    }

    /// Edits an item; packing unit prices follow any base price change.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown item and the same validation errors as
    /// [`Books::add_item`]. The item is unchanged on error.
    pub fn update_item(&mut self, id: ItemId, patch: ItemPatch) -> Result<&InventoryItem, LedgerError> {
        self.try_update_item(id, patch)
            .inspect_err(|e| rejected("update_item", e))?;
        self.inventory.get(id)
    }

    fn try_update_item(&mut self, id: ItemId, patch: ItemPatch) -> Result<(), LedgerError> {
        let item = self.inventory.update_item(&self.sequence, id, patch)?;
        info!(item = %id, purchase_price = %item.purchase_price, "Item updated");
        let detail = item.name.clone();
        self.record(Action::Updated, ITEM, id, detail);
        Ok(())
    }

    /// Archives an item with no stock on hand.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `AlreadyArchived`, or `ItemHasStock` if stock remains.
    pub fn archive_item(&mut self, id: ItemId) -> Result<&InventoryItem, LedgerError> {
        self.try_archive_item(id)
            .inspect_err(|e| rejected("archive_item", e))?;
        self.inventory.get(id)
    }

    fn try_archive_item(&mut self, id: ItemId) -> Result<(), LedgerError> {
        self.inventory.archive_item(id)?;
        info!(item = %id, "Item archived");
        self.record(Action::Archived, ITEM, id, "");
        Ok(())
    }

    /// Records an inventory adjustment against a contra account.
    ///
    /// # Errors
    ///
    /// Rejects a contra account that is not a postable leaf or is the inventory
    /// account itself, unknown or archived items, and a deduction beyond stock.
    /// Nothing is written on error.
    pub fn add_inventory_adjustment(
        &mut self,
        input: AdjustmentInput,
    ) -> Result<&InventoryAdjustment, LedgerError> {
        let id = self
            .try_add_adjustment(input)
            .inspect_err(|e| rejected("add_inventory_adjustment", e))?;
        self.adjustment(id)
    }

    /// Replaces an active adjustment, as if archived and recreated under the same id.
    ///
    /// # Errors
    ///
    /// Returns `EntityArchived` for an archived adjustment, and otherwise the
    /// errors of [`Books::add_inventory_adjustment`] checked against the stock
    /// left after reversing the old effect.
    pub fn update_inventory_adjustment(
        &mut self,
        id: AdjustmentId,
        input: AdjustmentInput,
    ) -> Result<&InventoryAdjustment, LedgerError> {
        self.try_update_adjustment(id, input)
            .inspect_err(|e| rejected("update_inventory_adjustment", e))?;
        self.adjustment(id)
    }

    /// Archives an adjustment and reverses its effect.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyArchived`, or `InsufficientStock` if an addition's stock
    /// has since been consumed.
    pub fn archive_inventory_adjustment(
        &mut self,
        id: AdjustmentId,
    ) -> Result<&InventoryAdjustment, LedgerError> {
        self.try_archive_adjustment(id)
            .inspect_err(|e| rejected("archive_inventory_adjustment", e))?;
        self.adjustment(id)
    }

    /// Restores an archived adjustment, re-applying its exact effect.
    ///
    /// # Errors
    ///
    /// Returns `NotArchived`, an archived-item error if a line's item was
    /// archived meanwhile, or `InsufficientStock` for a deduction.
    pub fn unarchive_inventory_adjustment(
        &mut self,
        id: AdjustmentId,
    ) -> Result<&InventoryAdjustment, LedgerError> {
        self.try_unarchive_adjustment(id)
            .inspect_err(|e| rejected("unarchive_inventory_adjustment", e))?;
        self.adjustment(id)
    }

    fn adjustment(&self, id: AdjustmentId) -> Result<&InventoryAdjustment, LedgerError> {
        self.adjustments
            .get(&id)
            .ok_or_else(|| LedgerError::not_found(ADJUSTMENT, id))
    }

    fn check_contra(&self, contra: AccountId) -> Result<(), LedgerError> {
        if contra == self.roles.inventory {
            return Err(LedgerError::ContraIsInventory);
        }
        self.chart.require_postable(contra).map(|_| ())
    }

    fn adjustment_effect(&self, adjustment: &InventoryAdjustment) -> Effect {
        Effect::adjustment(
            adjustment.kind,
            adjustment.contra_account,
            &adjustment.lines,
            adjustment.total,
            &self.roles,
        )
    }

    fn adjustment_header(id: AdjustmentId, date: NaiveDate) -> EntryHeader {
        EntryHeader {
            date,
            description: format!("{ADJUSTMENT} {id}"),
            source: JournalSource::Adjustment(id),
        }
    }

    fn try_add_adjustment(&mut self, input: AdjustmentInput) -> Result<AdjustmentId, LedgerError> {
        self.check_contra(input.contra_account)?;
        let (lines, total) = self.resolve_line_items(&input.lines)?;
        let effect = Effect::adjustment(input.kind, input.contra_account, &lines, total, &self.roles);
        self.inventory.check_stock_deltas(&effect.stock)?;
        let prepared = Journal::prepare(&self.chart, &effect.lines)?;

        let id: AdjustmentId = self.sequence.next();
        let entry_id: JournalEntryId = self.sequence.next();
        self.journal
            .commit(&mut self.chart, entry_id, Self::adjustment_header(id, input.date), prepared)?;
        self.inventory.apply_stock_deltas(&effect.stock)?;

        info!(adjustment = %id, entry = %entry_id, total = %total, "Inventory adjustment created");
        self.adjustments.insert(
            id,
            InventoryAdjustment {
                id,
                journal_entry_id: entry_id,
                date: input.date,
                kind: input.kind,
                contra_account: input.contra_account,
                lines,
                total,
                notes: input.notes,
                is_archived: false,
            },
        );
        self.record(Action::Created, ADJUSTMENT, id, format!("{:?} {total}", input.kind));
        Ok(id)
    }

    fn try_update_adjustment(
        &mut self,
        id: AdjustmentId,
        input: AdjustmentInput,
    ) -> Result<(), LedgerError> {
        let old = self.adjustment(id)?;
        if old.is_archived {
            return Err(LedgerError::entity_archived(ADJUSTMENT, id));
        }
        let old_entry = old.journal_entry_id;
        let old_effect = self.adjustment_effect(old);

        self.check_contra(input.contra_account)?;
        let (lines, total) = self.resolve_line_items(&input.lines)?;
        let new_effect = Effect::adjustment(input.kind, input.contra_account, &lines, total, &self.roles);
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
        self.journal
            .commit(&mut self.chart, entry_id, Self::adjustment_header(id, input.date), prepared)?;
        self.inventory.apply_stock_deltas(&stock)?;

        info!(adjustment = %id, entry = %entry_id, total = %total, "Inventory adjustment updated");
        self.adjustments.insert(
            id,
            InventoryAdjustment {
                id,
                journal_entry_id: entry_id,
                date: input.date,
                kind: input.kind,
                contra_account: input.contra_account,
                lines,
                total,
                notes: input.notes,
                is_archived: false,
            },
        );
        self.record(Action::Updated, ADJUSTMENT, id, format!("{:?} {total}", input.kind));
        Ok(())
    }

    fn try_archive_adjustment(&mut self, id: AdjustmentId) -> Result<(), LedgerError> {
        let adjustment = self.adjustment(id)?;
        if adjustment.is_archived {
            return Err(LedgerError::already_archived(ADJUSTMENT, id));
        }
        let entry_id = adjustment.journal_entry_id;
        let stock = self.adjustment_effect(adjustment).negated_stock();
        self.inventory.check_stock_deltas(&stock)?;
        self.journal.check_reversal(&self.chart, entry_id)?;

        self.journal.reverse(&mut self.chart, entry_id)?;
        self.inventory.apply_stock_deltas(&stock)?;
        if let Some(adjustment) = self.adjustments.get_mut(&id) {
            adjustment.is_archived = true;
        }
        info!(adjustment = %id, entry = %entry_id, "Inventory adjustment archived");
        self.record(Action::Archived, ADJUSTMENT, id, "");
        Ok(())
    }

    fn try_unarchive_adjustment(&mut self, id: AdjustmentId) -> Result<(), LedgerError> {
        let adjustment = self.adjustment(id)?;
        if !adjustment.is_archived {
            return Err(LedgerError::not_archived(ADJUSTMENT, id));
        }
        let entry_id = adjustment.journal_entry_id;
        let stock = self.adjustment_effect(adjustment).stock;
        self.check_items_active(&stock)?;
        self.inventory.check_stock_deltas(&stock)?;
        self.journal.check_reinstatement(&self.chart, entry_id)?;

        self.journal.reinstate(&mut self.chart, entry_id)?;
        self.inventory.apply_stock_deltas(&stock)?;
        if let Some(adjustment) = self.adjustments.get_mut(&id) {
            adjustment.is_archived = false;
        }
        info!(adjustment = %id, entry = %entry_id, "Inventory adjustment unarchived");
        self.record(Action::Unarchived, ADJUSTMENT, id, "");
        Ok(())
    }
}
