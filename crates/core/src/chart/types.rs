//! Account domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mizan_shared::types::AccountId;

/// A node in the chart of accounts.
///
/// Balances follow the debit-positive convention: assets and expenses carry
/// positive balances for a debit excess, liabilities, equity, and revenue carry
/// negative balances for a credit excess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Stable identifier.
    pub id: AccountId,
    /// Hierarchical code; extends the parent's code.
    pub code: String,
    /// Display name, unique across the chart.
    pub name: String,
    /// Parent account (`None` for statement roots).
    pub parent_id: Option<AccountId>,
    /// Child accounts ordered by code.
    pub children: Vec<AccountId>,
    /// Running balance. Only meaningful on leaf accounts.
    pub balance: Decimal,
    /// Soft-delete flag.
    pub is_archived: bool,
}

impl Account {
    /// Returns true if the account has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns true if the account is a statement root.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

/// Input for `add_account`.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAccount {
    /// Display name.
    pub name: String,
    /// Code; must extend the parent's code.
    pub code: String,
    /// Parent account.
    pub parent_id: AccountId,
}

impl NewAccount {
    /// Creates an account input.
    #[must_use]
    pub fn new(name: impl Into<String>, code: impl Into<String>, parent_id: AccountId) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            parent_id,
        }
    }
}

/// Editable account fields. Balance and parent are never patched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountPatch {
    /// New name.
    pub name: Option<String>,
    /// New code.
    pub code: Option<String>,
}
