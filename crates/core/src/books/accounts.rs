//! Chart of accounts operations and opening balances.

use rust_decimal::Decimal;
use tracing::info;

use mizan_shared::types::{AccountId, CustomerId, SupplierId};

use super::{Action, Books, rejected};
use crate::chart::{Account, AccountPatch, NewAccount};
use crate::error::LedgerError;

const ENTITY: &str = "Account";

/// Starting balances written directly, outside the journal.
#[derive(Debug, Clone, Default)]
pub struct OpeningBalances {
    /// Leaf account balances (debit positive).
    pub accounts: Vec<(AccountId, Decimal)>,
    /// Customer balances (positive: customer owes us).
    pub customers: Vec<(CustomerId, Decimal)>,
    /// Supplier balances (positive: we owe the supplier).
    pub suppliers: Vec<(SupplierId, Decimal)>,
}

impl Books {
    /// Adds an account under an existing parent.
    ///
    /// A parent that is still a leaf must have neither a balance nor recorded
    /// movements, since both would be orphaned once it gains a child.
    ///
    /// # Errors
    ///
    /// Returns an error for a missing or archived parent, a duplicate code or
    /// name, a code that does not extend the parent's, a parent with movements,
    /// or a parent that is a configured posting account.
    pub fn add_account(&mut self, input: NewAccount) -> Result<&Account, LedgerError> {
        let id = self
            .try_add_account(input)
            .inspect_err(|e| rejected("add_account", e))?;
        self.chart.get(id)
    }

    fn try_add_account(&mut self, input: NewAccount) -> Result<AccountId, LedgerError> {
        let parent = self.chart.get(input.parent_id)?;
        // Posting accounts must stay leaves.
        if parent.is_leaf() && self.roles.is_protected(parent.id) {
            return Err(LedgerError::ProtectedAccount(parent.id));
        }
        if parent.is_leaf() && self.journal.has_movement(parent.id) {
            return Err(LedgerError::AccountHasMovements(parent.id));
        }

        let id: AccountId = self.sequence.next();
        let account = self.chart.add_account(id, input)?;
        info!(account = %id, code = %account.code, "Account added");
        let detail = format!("{} {}", account.code, account.name);
        self.record(Action::Created, ENTITY, id, detail);
        Ok(id)
    }

    /// Renames or recodes an account. Balance and parent never change.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown account, a blank or duplicate name or code,
    /// or a code that breaks the parent-prefix rule.
    pub fn update_account(&mut self, id: AccountId, patch: AccountPatch) -> Result<&Account, LedgerError> {
        self.try_update_account(id, patch)
            .inspect_err(|e| rejected("update_account", e))?;
        self.chart.get(id)
    }

    fn try_update_account(&mut self, id: AccountId, patch: AccountPatch) -> Result<(), LedgerError> {
        let account = self.chart.update_account(id, patch)?;
        info!(account = %id, code = %account.code, "Account updated");
        let detail = format!("{} {}", account.code, account.name);
        self.record(Action::Updated, ENTITY, id, detail);
        Ok(())
    }

    /// Archives an account with a zero balance and no recorded movements.
    ///
    /// # Errors
    ///
    /// Returns a conflict for reserved accounts, a non-zero balance, recorded
    /// movements, active children, or an account already archived.
    pub fn archive_account(&mut self, id: AccountId) -> Result<(), LedgerError> {
        self.try_archive_account(id)
            .inspect_err(|e| rejected("archive_account", e))
    }

    fn try_archive_account(&mut self, id: AccountId) -> Result<(), LedgerError> {
        self.chart.get(id)?;
        if self.roles.is_protected(id) {
            return Err(LedgerError::ProtectedAccount(id));
        }
        let balance = self.chart.sum_subtree(id)?;
        if !balance.is_zero() {
            return Err(LedgerError::AccountHasBalance { id, balance });
        }
        if self.journal.has_movement(id) {
            return Err(LedgerError::AccountHasMovements(id));
        }
        self.chart.archive(id)?;

        info!(account = %id, "Account archived");
        self.record(Action::Archived, ENTITY, id, "");
        Ok(())
    }

    /// Overwrites starting balances of leaf accounts and parties.
    ///
    /// This is a setup operation that bypasses the journal; nothing forces the
    /// account figures to balance, and an unbalanced set shows up as an unbalanced
    /// balance sheet. Every target is validated before any balance is written.
    ///
    /// # Errors
    ///
    /// Returns an error if any account is not an active leaf or any party is
    /// unknown or archived.
    pub fn update_all_opening_balances(&mut self, balances: &OpeningBalances) -> Result<(), LedgerError> {
        self.try_update_opening_balances(balances)
            .inspect_err(|e| rejected("update_all_opening_balances", e))
    }

    fn try_update_opening_balances(&mut self, balances: &OpeningBalances) -> Result<(), LedgerError> {
        for (id, _) in &balances.accounts {
            self.chart.require_postable(*id)?;
        }
        for (id, _) in &balances.customers {
            self.customers.require_active(*id)?;
        }
        for (id, _) in &balances.suppliers {
            self.suppliers.require_active(*id)?;
        }

        for (id, balance) in &balances.accounts {
            self.chart.set_balance(*id, *balance)?;
        }
        for (id, balance) in &balances.customers {
            self.customers.set_opening(*id, *balance)?;
        }
        for (id, balance) in &balances.suppliers {
            self.suppliers.set_opening(*id, *balance)?;
        }

        info!(
            accounts = balances.accounts.len(),
            customers = balances.customers.len(),
            suppliers = balances.suppliers.len(),
            "Opening balances updated"
        );
        let detail = format!(
            "{} accounts, {} customers, {} suppliers",
            balances.accounts.len(),
            balances.customers.len(),
            balances.suppliers.len()
        );
        self.record(Action::OpeningBalances, "Books", "opening", detail);
        Ok(())
    }
}
