//! Report data types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mizan_shared::types::{AccountId, ItemId, JournalEntryId};

/// Leaf account balance for the trial balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Debit presentation (positive balance).
    pub debit: Decimal,
    /// Credit presentation (negated negative balance).
    pub credit: Decimal,
    /// Signed balance, debit positive.
    pub balance: Decimal,
}

/// Trial balance report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceReport {
    /// Report type identifier.
    pub report_type: String,
    /// Active leaf accounts in code order.
    pub accounts: Vec<AccountBalance>,
    /// Totals.
    pub totals: TrialBalanceTotals,
}

/// Trial balance totals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialBalanceTotals {
    /// Total debit.
    pub total_debit: Decimal,
    /// Total credit.
    pub total_credit: Decimal,
    /// Whether debits equal credits.
    pub is_balanced: bool,
}

/// One account in a statement section, parents included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Depth below the section root.
    pub depth: usize,
    /// Subtree total on the section's normal side.
    pub amount: Decimal,
}

/// A statement section: a subtree and its total.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatementSection {
    /// Section total.
    pub total: Decimal,
    /// Accounts in walk order.
    pub accounts: Vec<StatementLine>,
}

/// Balance sheet report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BalanceSheetReport {
    /// Report type identifier.
    pub report_type: String,
    /// Assets section, inventory at its costed valuation.
    pub assets: StatementSection,
    /// Liabilities section.
    pub liabilities: StatementSection,
    /// Equity section.
    pub equity: StatementSection,
    /// Profit for the period, including the inventory revaluation.
    pub net_profit: Decimal,
    /// Costed inventory valuation minus the recorded inventory balance.
    pub inventory_revaluation: Decimal,
    /// Total assets.
    pub total_assets: Decimal,
    /// Total liabilities.
    pub total_liabilities: Decimal,
    /// Total equity, before net profit.
    pub total_equity: Decimal,
    /// Liabilities plus equity plus net profit.
    pub liabilities_and_equity: Decimal,
    /// Whether assets equal liabilities plus equity within tolerance.
    pub is_balanced: bool,
}

/// Profit and loss report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfitAndLossReport {
    /// Report type identifier.
    pub report_type: String,
    /// Revenue accounts, credit side positive.
    pub revenue: StatementSection,
    /// Operating expenses, debit side positive.
    pub expenses: StatementSection,
    /// Revenue minus expenses.
    pub net_profit: Decimal,
}

/// Account statement row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStatementLine {
    /// Journal entry.
    pub entry_id: JournalEntryId,
    /// Entry date.
    pub date: NaiveDate,
    /// Entry description.
    pub description: String,
    /// Debit amount.
    pub debit: Decimal,
    /// Credit amount.
    pub credit: Decimal,
    /// Running balance.
    pub running_balance: Decimal,
}

/// Ledger card of one leaf account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountStatement {
    /// Account ID.
    pub account_id: AccountId,
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Balance before the first posted line (opening balances).
    pub opening_balance: Decimal,
    /// Posted lines by date.
    pub lines: Vec<AccountStatementLine>,
    /// Current balance.
    pub closing_balance: Decimal,
}

/// A movement on a customer or supplier balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyMovement {
    /// Document date.
    pub date: NaiveDate,
    /// Document reference, e.g. `SAL-000003`.
    pub reference: String,
    /// Document kind and notes.
    pub description: String,
    /// Signed balance change.
    pub amount: Decimal,
}

/// Party statement row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyStatementLine {
    /// The movement.
    #[serde(flatten)]
    pub movement: PartyMovement,
    /// Balance after the movement.
    pub running_balance: Decimal,
}

/// Statement of one customer or supplier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyStatement {
    /// Party reference.
    pub party: String,
    /// Party name.
    pub name: String,
    /// Balance before the first movement.
    pub opening_balance: Decimal,
    /// Movements by date.
    pub lines: Vec<PartyStatementLine>,
    /// Current balance.
    pub closing_balance: Decimal,
}

/// Costed stock of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemValuation {
    /// Item ID.
    pub item_id: ItemId,
    /// Item name.
    pub name: String,
    /// Base unit name.
    pub base_unit: String,
    /// Stock in base units.
    pub stock: Decimal,
    /// Purchase price per base unit.
    pub unit_cost: Decimal,
    /// `stock × unit_cost`.
    pub value: Decimal,
}

/// Inventory valuation report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryValuationReport {
    /// Items with stock or value.
    pub items: Vec<ItemValuation>,
    /// Total costed value.
    pub total: Decimal,
    /// Balance of the inventory account.
    pub recorded_balance: Decimal,
    /// `total - recorded_balance`.
    pub difference: Decimal,
}

/// Sub-ledger totals against their control accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyReconciliation {
    /// Sum of customer balances.
    pub customers_total: Decimal,
    /// Receivable account balance.
    pub receivable_balance: Decimal,
    /// Sum of supplier balances.
    pub suppliers_total: Decimal,
    /// Payable account balance, negated.
    pub payable_balance: Decimal,
    /// Whether both pairs agree within tolerance.
    pub is_reconciled: bool,
}
