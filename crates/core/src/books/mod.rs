//! The books: a single owner for every ledger collection.
//!
//! All mutation goes through the operations on [`Books`]. Each operation
//! validates everything it needs (inputs, referenced records, stock, journal
//! lines) before the first change, then applies the journal entry, stock, and
//! party movements together, so a rejected operation leaves the books unchanged.

mod accounts;
pub mod audit;
mod entries;
mod parties;
mod statements;
mod stock;
mod trades;
mod treasury;

#[cfg(test)]
mod books_props;

use std::collections::BTreeMap;
use std::fmt::Display;

use tracing::{info, warn};

use mizan_shared::LedgerSettings;
use mizan_shared::types::{
    AccountId, AdjustmentId, CustomerId, ItemId, PurchaseId, PurchaseReturnId, SaleId, SaleReturnId,
    SupplierId, TreasuryId,
};

use crate::chart::{AccountRoles, ChartOfAccounts, default_chart};
use crate::error::LedgerError;
use crate::inventory::{Inventory, InventoryItem, StockDelta};
use crate::journal::Journal;
use crate::party::{PartyDelta, PartyLedger};
use crate::sequence::SequenceGenerator;
use crate::trade::{
    InventoryAdjustment, Purchase, PurchaseReturn, Sale, SaleReturn, TreasuryTransaction,
};

pub use accounts::OpeningBalances;
pub use audit::{Action, ActivityEntry, ActivityLog};
pub use entries::ManualEntryInput;

/// Actor recorded when none was set.
pub const DEFAULT_ACTOR: &str = "system";

/// In-memory books of one business.
#[derive(Debug)]
pub struct Books {
    settings: LedgerSettings,
    roles: AccountRoles,
    sequence: SequenceGenerator,
    chart: ChartOfAccounts,
    journal: Journal,
    customers: PartyLedger<CustomerId>,
    suppliers: PartyLedger<SupplierId>,
    inventory: Inventory,
    sales: BTreeMap<SaleId, Sale>,
    purchases: BTreeMap<PurchaseId, Purchase>,
    sale_returns: BTreeMap<SaleReturnId, SaleReturn>,
    purchase_returns: BTreeMap<PurchaseReturnId, PurchaseReturn>,
    adjustments: BTreeMap<AdjustmentId, InventoryAdjustment>,
    treasury: BTreeMap<TreasuryId, TreasuryTransaction>,
    activity: ActivityLog,
    actor: String,
}

impl Books {
    /// Opens empty books on the default chart of accounts.
    ///
    /// # Errors
    ///
    /// Returns an error if `settings` name accounts the default chart lacks.
    pub fn new(settings: LedgerSettings) -> Result<Self, LedgerError> {
        let sequence = SequenceGenerator::new();
        let chart = default_chart(&sequence)?;
        Self::with_chart(settings, sequence, chart)
    }

    /// Opens books on a prepared chart. `sequence` must be the generator the
    /// chart's account ids came from.
    ///
    /// # Errors
    ///
    /// Returns an error if a configured account code cannot be resolved.
    pub fn with_chart(
        settings: LedgerSettings,
        sequence: SequenceGenerator,
        chart: ChartOfAccounts,
    ) -> Result<Self, LedgerError> {
        let roles = AccountRoles::resolve(&chart, &settings)?;
        info!(
            accounts = chart.len(),
            allow_negative_stock = settings.allow_negative_stock,
            "Books opened"
        );
        Ok(Self {
            inventory: Inventory::new(settings.allow_negative_stock),
            settings,
            roles,
            sequence,
            chart,
            journal: Journal::new(),
            customers: PartyLedger::new("Customer"),
            suppliers: PartyLedger::new("Supplier"),
            sales: BTreeMap::new(),
            purchases: BTreeMap::new(),
            sale_returns: BTreeMap::new(),
            purchase_returns: BTreeMap::new(),
            adjustments: BTreeMap::new(),
            treasury: BTreeMap::new(),
            activity: ActivityLog::default(),
            actor: DEFAULT_ACTOR.to_string(),
        })
    }

    /// Sets the actor recorded in the activity log.
    #[must_use]
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.set_actor(actor);
        self
    }

    /// Changes the actor recorded in the activity log.
    pub fn set_actor(&mut self, actor: impl Into<String>) {
        self.actor = actor.into();
    }

    /// Current actor.
    #[must_use]
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Ledger settings in force.
    #[must_use]
    pub fn settings(&self) -> &LedgerSettings {
        &self.settings
    }

    /// Resolved posting accounts and statement roots.
    #[must_use]
    pub fn roles(&self) -> &AccountRoles {
        &self.roles
    }

    /// The chart of accounts.
    #[must_use]
    pub fn chart(&self) -> &ChartOfAccounts {
        &self.chart
    }

    /// The journal.
    #[must_use]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Customers.
    #[must_use]
    pub fn customers(&self) -> &PartyLedger<CustomerId> {
        &self.customers
    }

    /// Suppliers.
    #[must_use]
    pub fn suppliers(&self) -> &PartyLedger<SupplierId> {
        &self.suppliers
    }

    /// Items and units.
    #[must_use]
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Sale invoices.
    #[must_use]
    pub fn sales(&self) -> &BTreeMap<SaleId, Sale> {
        &self.sales
    }

    /// Purchase invoices.
    #[must_use]
    pub fn purchases(&self) -> &BTreeMap<PurchaseId, Purchase> {
        &self.purchases
    }

    /// Sale returns.
    #[must_use]
    pub fn sale_returns(&self) -> &BTreeMap<SaleReturnId, SaleReturn> {
        &self.sale_returns
    }

    /// Purchase returns.
    #[must_use]
    pub fn purchase_returns(
        &self,
    ) -> &BTreeMap<PurchaseReturnId, PurchaseReturn> {
        &self.purchase_returns
    }

    /// Inventory adjustments.
    #[must_use]
    pub fn adjustments(&self) -> &BTreeMap<AdjustmentId, InventoryAdjustment> {
        &self.adjustments
    }

    /// Treasury vouchers.
    #[must_use]
    pub fn treasury(&self) -> &BTreeMap<TreasuryId, TreasuryTransaction> {
        &self.treasury
    }

    /// The activity log.
    #[must_use]
    pub fn activity_log(&self) -> &ActivityLog {
        &self.activity
    }

    /// Looks up an item.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown item.
    pub fn item(&self, id: ItemId) -> Result<&InventoryItem, LedgerError> {
        self.inventory.get(id)
    }

    fn record(
        &mut self,
        action: Action,
        entity: &'static str,
        entity_id: impl Display,
        detail: impl Into<String>,
    ) {
        self.activity.record(
            &self.actor,
            action,
            entity,
            entity_id.to_string(),
            detail.into(),
        );
    }

    fn check_party(&self, delta: PartyDelta) -> Result<(), LedgerError> {
        match delta {
            PartyDelta::Customer(id, _) => self.customers.require_active(id).map(|_| ()),
            PartyDelta::Supplier(id, _) => self.suppliers.require_active(id).map(|_| ()),
        }
    }

    fn apply_party(&mut self, delta: PartyDelta) -> Result<(), LedgerError> {
        match delta {
            PartyDelta::Customer(id, amount) => self.customers.apply(id, amount),
            PartyDelta::Supplier(id, amount) => self.suppliers.apply(id, amount),
        }
    }

    fn require_treasury(&self, id: AccountId) -> Result<(), LedgerError> {
        self.chart.require_postable(id)?;
        if !self.roles.is_treasury(&self.chart, id) {
            return Err(LedgerError::NotATreasury(id));
        }
        Ok(())
    }

    fn check_items_active(&self, stock: &[StockDelta]) -> Result<(), LedgerError> {
        for delta in stock {
            self.inventory.require_active(delta.item_id)?;
        }
        Ok(())
    }
}

/// Logs a rejected operation with its error code.
fn rejected(operation: &'static str, err: &LedgerError) {
    warn!(
        operation,
        code = err.error_code(),
        category = ?err.category(),
        error = %err,
        "Operation rejected"
    );
}
