//! Arena-backed account tree.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use mizan_shared::types::{AccountId, MoneyError};

use super::types::{Account, AccountPatch, NewAccount};
use crate::error::LedgerError;

/// Hierarchical account registry holding the authoritative leaf balances.
#[derive(Debug, Clone, Default)]
pub struct ChartOfAccounts {
    accounts: BTreeMap<AccountId, Account>,
    roots: Vec<AccountId>,
}

impl ChartOfAccounts {
    /// Creates an empty chart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a statement root (an account without a parent).
    pub fn add_root(
        &mut self,
        id: AccountId,
        code: &str,
        name: &str,
    ) -> Result<&Account, LedgerError> {
        let (code, name) = self.validate_identity(None, code, name)?;
        self.accounts.insert(
            id,
            Account {
                id,
                code,
                name,
                parent_id: None,
                children: Vec::new(),
                balance: Decimal::ZERO,
                is_archived: false,
            },
        );
        self.roots.push(id);
        self.sort_by_code_roots();
        self.get(id)
    }

    /// Adds a child account.
    ///
    /// The parent must be active and, if it is currently a leaf, must not carry a
    /// balance: once it has children its own balance would no longer be counted.
    /// Movement checks against the journal are the caller's responsibility.
    pub fn add_account(&mut self, id: AccountId, input: NewAccount) -> Result<&Account, LedgerError> {
        let parent = self.get(input.parent_id)?;
        if parent.is_archived {
            return Err(LedgerError::AccountArchived(parent.id));
        }
        if parent.is_leaf() && !parent.balance.is_zero() {
            return Err(LedgerError::AccountHasBalance {
                id: parent.id,
                balance: parent.balance,
            });
        }
        let parent_code = parent.code.clone();

        let (code, name) = self.validate_identity(Some(&parent_code), &input.code, &input.name)?;

        self.accounts.insert(
            id,
            Account {
                id,
                code,
                name,
                parent_id: Some(input.parent_id),
                children: Vec::new(),
                balance: Decimal::ZERO,
                is_archived: false,
            },
        );
        self.attach_child(input.parent_id, id);
        self.get(id)
    }

    /// Renames or recodes an account.
    pub fn update_account(&mut self, id: AccountId, patch: AccountPatch) -> Result<&Account, LedgerError> {
        let account = self.get(id)?;
        let parent_code = match account.parent_id {
            Some(parent) => Some(self.get(parent)?.code.clone()),
            None => None,
        };

        let new_name = match patch.name {
            Some(name) => {
                let name = name.trim().to_string();
                if name.is_empty() {
                    return Err(LedgerError::MissingField("name"));
                }
                if self.name_taken(&name, Some(id)) {
                    return Err(LedgerError::DuplicateAccountName(name));
                }
                Some(name)
            }
            None => None,
        };

        let new_code = match patch.code {
            Some(code) => {
                let code = code.trim().to_string();
                Self::validate_code(parent_code.as_deref(), &code)?;
                if self.code_taken(&code, Some(id)) {
                    return Err(LedgerError::DuplicateAccountCode(code));
                }
                for child in &account.children {
                    let child = self.get(*child)?;
                    if !child.code.starts_with(&code) || child.code.len() <= code.len() {
                        return Err(LedgerError::InvalidAccountCode {
                            code: child.code.clone(),
                            parent_code: code,
                        });
                    }
                }
                Some(code)
            }
            None => None,
        };

        let account = self.get_mut(id)?;
        if let Some(name) = new_name {
            account.name = name;
        }
        let recoded = new_code.is_some();
        if let Some(code) = new_code {
            account.code = code;
        }
        if recoded {
            match self.get(id)?.parent_id {
                Some(parent) => self.sort_children(parent),
                None => self.sort_by_code_roots(),
            }
        }
        self.get(id)
    }

    /// Marks an account archived. Balance and movement checks belong to the caller.
    pub fn archive(&mut self, id: AccountId) -> Result<(), LedgerError> {
        let account = self.get(id)?;
        if account.is_archived {
            return Err(LedgerError::already_archived("Account", id));
        }
        if account
            .children
            .iter()
            .any(|child| self.accounts.get(child).is_some_and(|c| !c.is_archived))
        {
            return Err(LedgerError::AccountHasActiveChildren(id));
        }
        self.get_mut(id)?.is_archived = true;
        Ok(())
    }

    /// Looks up an account by id.
    pub fn get(&self, id: AccountId) -> Result<&Account, LedgerError> {
        self.accounts.get(&id).ok_or(LedgerError::AccountNotFound(id))
    }

    fn get_mut(&mut self, id: AccountId) -> Result<&mut Account, LedgerError> {
        self.accounts
            .get_mut(&id)
            .ok_or(LedgerError::AccountNotFound(id))
    }

    /// Looks up an account by code.
    pub fn find_by_code(&self, code: &str) -> Result<&Account, LedgerError> {
        self.accounts
            .values()
            .find(|a| a.code == code)
            .ok_or_else(|| LedgerError::AccountCodeNotFound(code.to_string()))
    }

    /// Returns the account if it is an active leaf that may receive postings.
    pub fn require_postable(&self, id: AccountId) -> Result<&Account, LedgerError> {
        let account = self.get(id)?;
        if !account.is_leaf() {
            return Err(LedgerError::NotALeaf(id));
        }
        if account.is_archived {
            return Err(LedgerError::AccountArchived(id));
        }
        Ok(account)
    }

    /// Adds `delta` to a leaf balance (debit positive).
    pub fn apply_delta(&mut self, id: AccountId, delta: Decimal) -> Result<(), LedgerError> {
        let account = self.get_mut(id)?;
        if !account.is_leaf() {
            return Err(LedgerError::NotALeaf(id));
        }
        account.balance = account
            .balance
            .checked_add(delta)
            .ok_or(MoneyError::OutOfRange)?;
        Ok(())
    }

    /// Overwrites a leaf balance. Used only for opening balances.
    pub fn set_balance(&mut self, id: AccountId, balance: Decimal) -> Result<(), LedgerError> {
        let account = self.get_mut(id)?;
        if !account.is_leaf() {
            return Err(LedgerError::NotALeaf(id));
        }
        account.balance = balance;
        Ok(())
    }

    /// Sums the leaf balances under `id`.
    ///
    /// Stored balances on parent accounts are never read.
    pub fn sum_subtree(&self, id: AccountId) -> Result<Decimal, LedgerError> {
        self.sum_subtree_by(id, &|account: &Account| account.balance)
    }

    /// Sums the subtree under `id`, asking `leaf_value` for each leaf's figure.
    pub fn sum_subtree_by<F>(&self, id: AccountId, leaf_value: &F) -> Result<Decimal, LedgerError>
    where
        F: Fn(&Account) -> Decimal,
    {
        let account = self.get(id)?;
        if account.is_leaf() {
            return Ok(leaf_value(account));
        }
        account
            .children
            .iter()
            .try_fold(Decimal::ZERO, |total, child| {
                let value = self.sum_subtree_by(*child, leaf_value)?;
                Ok(total.checked_add(value).ok_or(MoneyError::OutOfRange)?)
            })
    }

    /// Returns true if `id` is `ancestor` or lies beneath it.
    #[must_use]
    pub fn is_within(&self, id: AccountId, ancestor: AccountId) -> bool {
        let mut current = Some(id);
        while let Some(cursor) = current {
            if cursor == ancestor {
                return true;
            }
            current = self.accounts.get(&cursor).and_then(|a| a.parent_id);
        }
        false
    }

    /// Depth-first walk of the subtree under `id` in code order, with depths.
    pub fn walk(&self, id: AccountId) -> Result<Vec<(&Account, usize)>, LedgerError> {
        let mut out = Vec::new();
        let mut stack = vec![(id, 0usize)];
        while let Some((cursor, depth)) = stack.pop() {
            let account = self.get(cursor)?;
            out.push((account, depth));
            for child in account.children.iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
        Ok(out)
    }

    /// Statement roots in code order.
    #[must_use]
    pub fn roots(&self) -> &[AccountId] {
        &self.roots
    }

    /// All accounts keyed by id.
    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values()
    }

    /// All leaf accounts.
    pub fn leaves(&self) -> impl Iterator<Item = &Account> {
        self.accounts.values().filter(|a| a.is_leaf())
    }

    /// Number of accounts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    /// Returns true if the chart has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Writes a balance onto any account, parents included, bypassing the leaf rule.
    #[cfg(test)]
    pub(crate) fn overwrite_stored_balance(&mut self, id: AccountId, balance: Decimal) {
        if let Some(account) = self.accounts.get_mut(&id) {
            account.balance = balance;
        }
    }

    fn validate_identity(
        &self,
        parent_code: Option<&str>,
        code: &str,
        name: &str,
    ) -> Result<(String, String), LedgerError> {
        let code = code.trim().to_string();
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(LedgerError::MissingField("name"));
        }
        Self::validate_code(parent_code, &code)?;
        if self.code_taken(&code, None) {
            return Err(LedgerError::DuplicateAccountCode(code));
        }
        if self.name_taken(&name, None) {
            return Err(LedgerError::DuplicateAccountName(name));
        }
        Ok((code, name))
    }

    fn validate_code(parent_code: Option<&str>, code: &str) -> Result<(), LedgerError> {
        if code.is_empty() {
            return Err(LedgerError::MissingField("code"));
        }
        if let Some(parent_code) = parent_code
            && (!code.starts_with(parent_code) || code.len() <= parent_code.len())
        {
            return Err(LedgerError::InvalidAccountCode {
                code: code.to_string(),
                parent_code: parent_code.to_string(),
            });
        }
        Ok(())
    }

    fn code_taken(&self, code: &str, except: Option<AccountId>) -> bool {
        self.accounts
            .values()
            .any(|a| a.code == code && Some(a.id) != except)
    }

    fn name_taken(&self, name: &str, except: Option<AccountId>) -> bool {
        let wanted = name.to_lowercase();
        self.accounts
            .values()
            .any(|a| a.name.to_lowercase() == wanted && Some(a.id) != except)
    }

    fn attach_child(&mut self, parent: AccountId, child: AccountId) {
        if let Some(account) = self.accounts.get_mut(&parent) {
            account.children.push(child);
        }
        self.sort_children(parent);
    }

    fn sort_children(&mut self, parent: AccountId) {
        let Some(children) = self.accounts.get(&parent).map(|a| a.children.clone()) else {
            return;
        };
        let mut keyed: Vec<(String, AccountId)> = children
            .into_iter()
            .filter_map(|id| self.accounts.get(&id).map(|a| (a.code.clone(), id)))
            .collect();
        keyed.sort();
        if let Some(account) = self.accounts.get_mut(&parent) {
            account.children = keyed.into_iter().map(|(_, id)| id).collect();
        }
    }

    fn sort_by_code_roots(&mut self) {
        let accounts = &self.accounts;
        self.roots
            .sort_by(|a, b| match (accounts.get(a), accounts.get(b)) {
                (Some(a), Some(b)) => a.code.cmp(&b.code),
                _ => a.cmp(b),
            });
    }
}
