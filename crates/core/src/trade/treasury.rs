//! Treasury vouchers: cash received into or paid out of a treasury account.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mizan_shared::types::{AccountId, CustomerId, JournalEntryId, SupplierId, TreasuryId};

/// Direction of a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreasuryKind {
    /// Money in (Dr treasury).
    Receipt,
    /// Money out (Cr treasury).
    Payment,
}

/// The other side of a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum Counterparty {
    /// A customer, posted through the receivable account.
    Customer(CustomerId),
    /// A supplier, posted through the payable account.
    Supplier(SupplierId),
    /// Any other leaf account.
    Account(AccountId),
}

/// Input for a voucher.
#[derive(Debug, Clone, Deserialize)]
pub struct TreasuryInput {
    /// Voucher date.
    pub date: NaiveDate,
    /// Direction.
    pub kind: TreasuryKind,
    /// Treasury leaf.
    pub treasury: AccountId,
    /// Other side.
    pub counterparty: Counterparty,
    /// Amount, strictly positive.
    pub amount: Decimal,
    /// Description.
    #[serde(default)]
    pub description: String,
}

/// Input for moving funds between two treasuries.
#[derive(Debug, Clone, Deserialize)]
pub struct TransferInput {
    /// Transfer date.
    pub date: NaiveDate,
    /// Treasury paying out.
    pub from: AccountId,
    /// Treasury receiving.
    pub to: AccountId,
    /// Amount, strictly positive.
    pub amount: Decimal,
    /// Note.
    #[serde(default)]
    pub note: String,
}

/// A recorded voucher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreasuryTransaction {
    /// Identifier.
    pub id: TreasuryId,
    /// The journal entry carrying the financial effect; shared by both legs of a transfer.
    pub journal_entry_id: JournalEntryId,
    /// Voucher date.
    pub date: NaiveDate,
    /// Direction.
    pub kind: TreasuryKind,
    /// Treasury leaf.
    pub treasury: AccountId,
    /// Other side.
    pub counterparty: Counterparty,
    /// Amount.
    pub amount: Decimal,
    /// Description.
    pub description: String,
    /// The other leg of a transfer.
    pub linked: Option<TreasuryId>,
    /// Soft-delete flag.
    pub is_archived: bool,
}
