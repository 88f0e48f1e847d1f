//! Financial statements over the books.

use mizan_shared::types::{AccountId, CustomerId, SupplierId};

use super::Books;
use super::trades::TradeBook;
use crate::error::LedgerError;
use crate::party::PartyDelta;
use crate::reports::{
    AccountStatement, BalanceSheetReport, InventoryValuationReport, PartyMovement,
    PartyReconciliation, PartyStatement, ProfitAndLossReport, ReportService, TrialBalanceReport,
};
use crate::trade::{Effect, PurchaseKind, PurchaseReturnKind, SaleKind, SaleReturnKind};

impl Books {
    /// Trial balance over every active leaf account.
    #[must_use]
    pub fn trial_balance(&self) -> TrialBalanceReport {
        ReportService::trial_balance(&self.chart)
    }

    /// Balance sheet with inventory read at its costed valuation.
    ///
    /// # Errors
    ///
    /// Returns an integrity error if a configured statement root is missing, and
    /// `OutOfRange` if the stock valuation does not fit in a decimal.
    pub fn balance_sheet(&self) -> Result<BalanceSheetReport, LedgerError> {
        ReportService::balance_sheet(&self.chart, &self.roles, self.inventory.valuation()?)
    }

    /// Profit and loss since the chart was seeded.
    ///
    /// # Errors
    ///
    /// Returns an integrity error if a configured statement root is missing.
    pub fn profit_and_loss(&self) -> Result<ProfitAndLossReport, LedgerError> {
        ReportService::profit_and_loss(&self.chart, &self.roles)
    }

    /// Costed stock per item against the inventory account.
    ///
    /// # Errors
    ///
    /// Returns an integrity error if the inventory account is missing.
    pub fn inventory_valuation(&self) -> Result<InventoryValuationReport, LedgerError> {
        ReportService::inventory_valuation(&self.chart, &self.roles, &self.inventory)
    }

    /// Customer and supplier totals against the receivable and payable accounts.
    ///
    /// # Errors
    ///
    /// Returns an integrity error if a control account is missing.
    pub fn reconcile_parties(&self) -> Result<PartyReconciliation, LedgerError> {
        ReportService::reconcile_parties(
            &self.chart,
            &self.roles,
            self.customers.total_balance(),
            self.suppliers.total_balance(),
        )
    }

    /// Ledger card of one leaf account.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown or non-leaf account.
    pub fn account_statement(&self, id: AccountId) -> Result<AccountStatement, LedgerError> {
        ReportService::account_statement(&self.chart, &self.journal, id)
    }

    /// Documents and vouchers that moved a customer's balance.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown customer.
    pub fn customer_statement(&self, id: CustomerId) -> Result<PartyStatement, LedgerError> {
        let customer = self.customers.get(id)?;
        let movements = self
            .party_movements()
            .into_iter()
            .filter_map(|(delta, movement)| match delta {
                PartyDelta::Customer(party, _) if party == id => Some(movement),
                _ => None,
            })
            .collect();
        Ok(ReportService::party_statement(
            id.to_string(),
            customer.name.clone(),
            customer.balance,
            movements,
        ))
    }

    /// Documents and vouchers that moved a supplier's balance.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown supplier.
    pub fn supplier_statement(&self, id: SupplierId) -> Result<PartyStatement, LedgerError> {
        let supplier = self.suppliers.get(id)?;
        let movements = self
            .party_movements()
            .into_iter()
            .filter_map(|(delta, movement)| match delta {
                PartyDelta::Supplier(party, _) if party == id => Some(movement),
                _ => None,
            })
            .collect();
        Ok(ReportService::party_statement(
            id.to_string(),
            supplier.name.clone(),
            supplier.balance,
            movements,
        ))
    }

    /// Every active party movement, re-derived from the stored documents.
    fn party_movements(&self) -> Vec<(PartyDelta, PartyMovement)> {
        let mut out = Vec::new();
        self.trade_movements::<SaleKind>(&mut out);
        self.trade_movements::<SaleReturnKind>(&mut out);
        self.trade_movements::<PurchaseKind>(&mut out);
        self.trade_movements::<PurchaseReturnKind>(&mut out);

        for voucher in self.treasury.values().filter(|v| !v.is_archived) {
            let effect = Effect::treasury(
                voucher.kind,
                voucher.treasury,
                voucher.counterparty,
                voucher.amount,
                &self.roles,
            );
            if let Some(delta) = effect.party {
                out.push((
                    delta,
                    PartyMovement {
                        date: voucher.date,
                        reference: voucher.id.to_string(),
                        description: voucher.description.clone(),
                        amount: delta.amount(),
                    },
                ));
            }
        }
        out
    }

    fn trade_movements<K: TradeBook>(&self, out: &mut Vec<(PartyDelta, PartyMovement)>) {
        for document in K::documents(self).values().filter(|d| !d.is_archived) {
            if let Some(delta) = Effect::trade::<K>(&document.terms, &self.roles).party {
                out.push((
                    delta,
                    PartyMovement {
                        date: document.terms.date,
                        reference: document.id.to_string(),
                        description: K::KIND.entity().to_string(),
                        amount: delta.amount(),
                    },
                ));
            }
        }
    }
}
