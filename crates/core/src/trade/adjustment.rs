//! Inventory adjustments: stock added or written off against a contra account.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mizan_shared::types::{AccountId, AdjustmentId, JournalEntryId};

use super::types::{LineItem, LineItemInput};

/// Direction of an adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentKind {
    /// Stock added (Dr Inventory / Cr contra).
    #[serde(alias = "إضافة")]
    Addition,
    /// Stock issued or written off (Dr contra / Cr Inventory).
    #[serde(alias = "صرف")]
    Deduction,
}

/// Input for creating or updating an adjustment.
///
/// Line prices are the cost per selected unit.
#[derive(Debug, Clone, Deserialize)]
pub struct AdjustmentInput {
    /// Adjustment date.
    pub date: NaiveDate,
    /// Direction.
    pub kind: AdjustmentKind,
    /// Account on the other side of the inventory movement.
    pub contra_account: AccountId,
    /// Lines.
    pub lines: Vec<LineItemInput>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

/// A recorded inventory adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryAdjustment {
    /// Identifier.
    pub id: AdjustmentId,
    /// The journal entry carrying the financial effect.
    pub journal_entry_id: JournalEntryId,
    /// Adjustment date.
    pub date: NaiveDate,
    /// Direction.
    pub kind: AdjustmentKind,
    /// Contra account.
    pub contra_account: AccountId,
    /// Lines; `price` is the unit cost.
    pub lines: Vec<LineItem>,
    /// Sum of line totals.
    pub total: Decimal,
    /// Free-text notes.
    pub notes: String,
    /// Soft-delete flag.
    pub is_archived: bool,
}
