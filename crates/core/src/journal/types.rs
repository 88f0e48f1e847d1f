//! Journal domain types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mizan_shared::types::{
    AccountId, AdjustmentId, BALANCE_TOLERANCE, JournalEntryId, PurchaseId, PurchaseReturnId,
    SaleId, SaleReturnId, TreasuryId, within_tolerance,
};

/// Journal entry status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JournalStatus {
    /// Recorded but not yet applied to balances.
    #[serde(rename = "under review")]
    UnderReview,
    /// Applied to account balances.
    #[serde(rename = "posted")]
    Posted,
}

/// What produced a journal entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum JournalSource {
    /// Entered by a user.
    Manual,
    /// Sale invoice.
    Sale(SaleId),
    /// Purchase invoice.
    Purchase(PurchaseId),
    /// Sale return.
    SaleReturn(SaleReturnId),
    /// Purchase return.
    PurchaseReturn(PurchaseReturnId),
    /// Inventory adjustment.
    Adjustment(AdjustmentId),
    /// Treasury voucher.
    Treasury(TreasuryId),
}

impl JournalSource {
    /// Returns true if a business document owns the entry.
    #[must_use]
    pub fn is_document(&self) -> bool {
        !matches!(self, Self::Manual)
    }
}

/// A line submitted for posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineDraft {
    /// Leaf account to post to.
    pub account_id: AccountId,
    /// Debit amount (0 if credit).
    pub debit: Decimal,
    /// Credit amount (0 if debit).
    pub credit: Decimal,
}

impl LineDraft {
    /// Creates a debit line.
    #[must_use]
    pub fn debit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: amount,
            credit: Decimal::ZERO,
        }
    }

    /// Creates a credit line.
    #[must_use]
    pub fn credit(account_id: AccountId, amount: Decimal) -> Self {
        Self {
            account_id,
            debit: Decimal::ZERO,
            credit: amount,
        }
    }

    /// Returns the same line on the opposite side.
    #[must_use]
    pub fn swapped(self) -> Self {
        Self {
            account_id: self.account_id,
            debit: self.credit,
            credit: self.debit,
        }
    }
}

/// A posted line, with the account name captured at posting time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalLine {
    /// Leaf account.
    pub account_id: AccountId,
    /// Account name when the entry was recorded.
    pub account_name: String,
    /// Debit amount (0 if credit).
    pub debit: Decimal,
    /// Credit amount (0 if debit).
    pub credit: Decimal,
}

impl JournalLine {
    /// Returns the balance effect of the line (debit positive).
    #[must_use]
    pub fn signed_amount(&self) -> Decimal {
        self.debit - self.credit
    }
}

/// Date, description, and origin of a new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    /// Entry date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Origin.
    pub source: JournalSource,
}

/// A balanced set of debit and credit lines.
///
/// Lines are immutable once recorded; corrections archive (reverse) the entry and
/// record a new one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Sequential identifier.
    pub id: JournalEntryId,
    /// Entry date.
    pub date: NaiveDate,
    /// Description.
    pub description: String,
    /// Origin of the entry.
    pub source: JournalSource,
    /// Total debits.
    pub debit: Decimal,
    /// Total credits.
    pub credit: Decimal,
    /// Review or posted.
    pub status: JournalStatus,
    /// Ordered lines.
    pub lines: Vec<JournalLine>,
    /// True once the entry has been reversed or discarded.
    pub is_archived: bool,
}

impl JournalEntry {
    /// Returns true if the entry currently affects balances.
    #[must_use]
    pub fn is_effective(&self) -> bool {
        self.status == JournalStatus::Posted && !self.is_archived
    }
}

/// Debit and credit sums of a set of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JournalTotals {
    /// Total debit amount.
    pub debit: Decimal,
    /// Total credit amount.
    pub credit: Decimal,
}

impl JournalTotals {
    /// Sums the given lines.
    #[must_use]
    pub fn of(lines: &[LineDraft]) -> Self {
        Self {
            debit: lines.iter().map(|l| l.debit).sum(),
            credit: lines.iter().map(|l| l.credit).sum(),
        }
    }

    /// Returns true if debits equal credits within the balance tolerance.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        within_tolerance(self.debit, self.credit, BALANCE_TOLERANCE)
    }

    /// Returns the difference between debits and credits.
    #[must_use]
    pub fn difference(&self) -> Decimal {
        self.debit - self.credit
    }
}
