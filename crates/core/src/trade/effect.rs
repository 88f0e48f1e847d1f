//! Financial effect of each document type.

use rust_decimal::Decimal;

use mizan_shared::types::AccountId;

use super::adjustment::AdjustmentKind;
use super::treasury::{Counterparty, TreasuryKind};
use super::types::{DocumentKind, LineItem, Settlement, TradeKind, TradeTerms};
use crate::chart::AccountRoles;
use crate::inventory::StockDelta;
use crate::journal::LineDraft;
use crate::party::PartyDelta;

/// Journal lines plus the stock and party movements of one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Effect {
    /// Balanced journal lines.
    pub lines: Vec<LineDraft>,
    /// Stock movements in base units.
    pub stock: Vec<StockDelta>,
    /// Party balance movement.
    pub party: Option<PartyDelta>,
}

impl Effect {
    /// Effect of a sale, purchase, or return.
    ///
    /// | Document        | Journal                                        | Stock | Party  |
    /// |-----------------|------------------------------------------------|-------|--------|
    /// | Sale            | Dr settlement / Cr revenue; Dr COGS / Cr stock | out   | +total |
    /// | Sale return     | Dr revenue / Cr settlement; Dr stock / Cr COGS | in    | -total |
    /// | Purchase        | Dr inventory / Cr settlement                   | in    | +total |
    /// | Purchase return | Dr settlement / Cr inventory                   | out   | -total |
    ///
    /// The settlement account is the receivable or payable account for documents
    /// on account and the treasury for cash documents; the party only moves on
    /// account.
    #[must_use]
    pub fn trade<K: TradeKind>(terms: &TradeTerms<K::PartyId>, roles: &AccountRoles) -> Self {
        let kind = K::KIND;
        let total = terms.total;
        let cost = terms.cost();
        let settlement = settlement_account(kind, terms.settlement, roles);

        let mut lines = match kind {
            DocumentKind::Sale => vec![
                LineDraft::debit(settlement, total),
                LineDraft::credit(roles.sales_revenue, total),
            ],
            DocumentKind::SaleReturn => vec![
                LineDraft::debit(roles.sales_revenue, total),
                LineDraft::credit(settlement, total),
            ],
            DocumentKind::Purchase => vec![
                LineDraft::debit(roles.inventory, total),
                LineDraft::credit(settlement, total),
            ],
            DocumentKind::PurchaseReturn => vec![
                LineDraft::debit(settlement, total),
                LineDraft::credit(roles.inventory, total),
            ],
        };
        if cost > Decimal::ZERO {
            match kind {
                DocumentKind::Sale => lines.extend([
                    LineDraft::debit(roles.cost_of_goods_sold, cost),
                    LineDraft::credit(roles.inventory, cost),
                ]),
                DocumentKind::SaleReturn => lines.extend([
                    LineDraft::debit(roles.inventory, cost),
                    LineDraft::credit(roles.cost_of_goods_sold, cost),
                ]),
                DocumentKind::Purchase | DocumentKind::PurchaseReturn => {}
            }
        }

        let party = match (terms.settlement, terms.party) {
            (Settlement::OnAccount, Some(party)) => {
                let amount = if kind.is_return() { -total } else { total };
                Some(K::party_delta(party, amount))
            }
            _ => None,
        };

        Self {
            lines,
            stock: stock_deltas(&terms.lines, kind.is_stock_inflow()),
            party,
        }
    }

    /// Effect of an inventory adjustment.
    #[must_use]
    pub fn adjustment(
        kind: AdjustmentKind,
        contra_account: AccountId,
        items: &[LineItem],
        total: Decimal,
        roles: &AccountRoles,
    ) -> Self {
        let (lines, inflow) = match kind {
            AdjustmentKind::Addition => (
                vec![
                    LineDraft::debit(roles.inventory, total),
                    LineDraft::credit(contra_account, total),
                ],
                true,
            ),
            AdjustmentKind::Deduction => (
                vec![
                    LineDraft::debit(contra_account, total),
                    LineDraft::credit(roles.inventory, total),
                ],
                false,
            ),
        };
        Self {
            lines,
            stock: stock_deltas(items, inflow),
            party: None,
        }
    }

    /// Effect of a treasury voucher.
    ///
    /// Receipts from customers lower what they owe us; receipts from suppliers
    /// raise what we owe them. Payments move the other way.
    #[must_use]
    pub fn treasury(
        kind: TreasuryKind,
        treasury: AccountId,
        counterparty: Counterparty,
        amount: Decimal,
        roles: &AccountRoles,
    ) -> Self {
        let contra = match counterparty {
            Counterparty::Customer(_) => roles.receivable,
            Counterparty::Supplier(_) => roles.payable,
            Counterparty::Account(account) => account,
        };
        let lines = match kind {
            TreasuryKind::Receipt => vec![
                LineDraft::debit(treasury, amount),
                LineDraft::credit(contra, amount),
            ],
            TreasuryKind::Payment => vec![
                LineDraft::debit(contra, amount),
                LineDraft::credit(treasury, amount),
            ],
        };
        let party = match (counterparty, kind) {
            (Counterparty::Customer(id), TreasuryKind::Receipt) => {
                Some(PartyDelta::Customer(id, -amount))
            }
            (Counterparty::Customer(id), TreasuryKind::Payment) => {
                Some(PartyDelta::Customer(id, amount))
            }
            (Counterparty::Supplier(id), TreasuryKind::Receipt) => {
                Some(PartyDelta::Supplier(id, amount))
            }
            (Counterparty::Supplier(id), TreasuryKind::Payment) => {
                Some(PartyDelta::Supplier(id, -amount))
            }
            (Counterparty::Account(_), _) => None,
        };
        Self {
            lines,
            stock: Vec::new(),
            party,
        }
    }

    /// Stock movements that undo this effect.
    #[must_use]
    pub fn negated_stock(&self) -> Vec<StockDelta> {
        self.stock.iter().map(|d| d.negated()).collect()
    }
}

fn settlement_account(kind: DocumentKind, settlement: Settlement, roles: &AccountRoles) -> AccountId {
    match settlement {
        Settlement::OnAccount if kind.is_customer_side() => roles.receivable,
        Settlement::OnAccount => roles.payable,
        Settlement::Cash { treasury } => treasury.unwrap_or(roles.default_treasury),
    }
}

fn stock_deltas(items: &[LineItem], inflow: bool) -> Vec<StockDelta> {
    items
        .iter()
        .map(|line| StockDelta {
            item_id: line.item_id,
            quantity: if inflow {
                line.base_quantity
            } else {
                -line.base_quantity
            },
        })
        .collect()
}
