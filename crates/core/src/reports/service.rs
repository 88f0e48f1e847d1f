//! Report generation service.
//!
//! Every figure is recomputed from leaf balances on demand; stored parent
//! balances are never read.

use rust_decimal::Decimal;

use mizan_shared::types::{AccountId, MoneyError, STATEMENT_TOLERANCE, checked_sum, within_tolerance};

use super::types::{
    AccountBalance, AccountStatement, AccountStatementLine, BalanceSheetReport, InventoryValuationReport,
    ItemValuation, PartyMovement, PartyReconciliation, PartyStatement, PartyStatementLine,
    ProfitAndLossReport, StatementLine, StatementSection, TrialBalanceReport, TrialBalanceTotals,
};
use crate::chart::{Account, AccountRoles, ChartOfAccounts};
use crate::error::LedgerError;
use crate::inventory::Inventory;
use crate::journal::Journal;

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates a trial balance over every active leaf account.
    ///
    /// The trial balance verifies that total debits equal total credits.
    #[must_use]
    pub fn trial_balance(chart: &ChartOfAccounts) -> TrialBalanceReport {
        let mut accounts: Vec<AccountBalance> = chart
            .leaves()
            .filter(|a| !a.is_archived)
            .map(|a| AccountBalance {
                account_id: a.id,
                code: a.code.clone(),
                name: a.name.clone(),
                debit: a.balance.max(Decimal::ZERO),
                credit: (-a.balance).max(Decimal::ZERO),
                balance: a.balance,
            })
            .collect();
        accounts.sort_by(|a, b| a.code.cmp(&b.code));

        let total_debit: Decimal = accounts.iter().map(|a| a.debit).sum();
        let total_credit: Decimal = accounts.iter().map(|a| a.credit).sum();

        TrialBalanceReport {
            report_type: "trial_balance".to_string(),
            accounts,
            totals: TrialBalanceTotals {
                total_debit,
                total_credit,
                is_balanced: total_debit == total_credit,
            },
        }
    }

    /// Generates the profit and loss statement since the chart was seeded.
    ///
    /// Revenue is the revenue-and-expense root without the operating expense
    /// branch, presented credit side positive; expenses are the operating
    /// expense branch, debit side positive.
    pub fn profit_and_loss(
        chart: &ChartOfAccounts,
        roles: &AccountRoles,
    ) -> Result<ProfitAndLossReport, LedgerError> {
        let balance = |a: &Account| a.balance;
        let expenses = Self::section(chart, roles.operating_expenses, Decimal::ONE, &balance, None)?;
        let revenue = Self::section(
            chart,
            roles.revenue_and_expenses,
            Decimal::NEGATIVE_ONE,
            &balance,
            Some(roles.operating_expenses),
        )?;
        let net_profit = difference(revenue.total, expenses.total)?;

        Ok(ProfitAndLossReport {
            report_type: "profit_and_loss".to_string(),
            revenue,
            expenses,
            net_profit,
        })
    }

    /// Generates the balance sheet.
    ///
    /// The inventory leaf is read at `valuation` (costed stock) instead of its
    /// recorded balance; the difference is carried into net profit as the
    /// inventory revaluation so that the identity still holds.
    pub fn balance_sheet(
        chart: &ChartOfAccounts,
        roles: &AccountRoles,
        valuation: Decimal,
    ) -> Result<BalanceSheetReport, LedgerError> {
        let recorded = chart.get(roles.inventory)?.balance;
        let inventory_revaluation = difference(valuation, recorded)?;
        let inventory = roles.inventory;
        let reconciled = move |a: &Account| if a.id == inventory { valuation } else { a.balance };

        let assets = Self::section(chart, roles.assets, Decimal::ONE, &reconciled, None)?;
        let liabilities = Self::section(chart, roles.liabilities, Decimal::NEGATIVE_ONE, &reconciled, None)?;
        let equity = Self::section(chart, roles.equity, Decimal::NEGATIVE_ONE, &reconciled, None)?;
        let net_profit = checked_sum([Self::profit_and_loss(chart, roles)?.net_profit, inventory_revaluation])?;

        let total_assets = assets.total;
        let total_liabilities = liabilities.total;
        let total_equity = equity.total;
        let liabilities_and_equity = checked_sum([total_liabilities, total_equity, net_profit])?;

        Ok(BalanceSheetReport {
            report_type: "balance_sheet".to_string(),
            assets,
            liabilities,
            equity,
            net_profit,
            inventory_revaluation,
            total_assets,
            total_liabilities,
            total_equity,
            liabilities_and_equity,
            is_balanced: within_tolerance(total_assets, liabilities_and_equity, STATEMENT_TOLERANCE),
        })
    }

    /// Generates the ledger card of one leaf account from posted entries.
    ///
    /// The opening balance is whatever the account held before its first
    /// posted line, i.e. its opening balance.
    pub fn account_statement(
        chart: &ChartOfAccounts,
        journal: &Journal,
        account_id: AccountId,
    ) -> Result<AccountStatement, LedgerError> {
        let account = chart.get(account_id)?;
        if !account.is_leaf() {
            return Err(LedgerError::NotALeaf(account_id));
        }

        let postings: Vec<_> = journal
            .effective()
            .into_iter()
            .flat_map(|entry| {
                entry
                    .lines
                    .iter()
                    .filter(|l| l.account_id == account_id)
                    .map(move |l| (entry, l))
            })
            .collect();
        let movement: Decimal = postings.iter().map(|(_, l)| l.signed_amount()).sum();
        let opening_balance = account.balance - movement;

        let mut running = opening_balance;
        let lines = postings
            .into_iter()
            .map(|(entry, line)| {
                running += line.signed_amount();
                AccountStatementLine {
                    entry_id: entry.id,
                    date: entry.date,
                    description: entry.description.clone(),
                    debit: line.debit,
                    credit: line.credit,
                    running_balance: running,
                }
            })
            .collect();

        Ok(AccountStatement {
            account_id,
            code: account.code.clone(),
            name: account.name.clone(),
            opening_balance,
            lines,
            closing_balance: account.balance,
        })
    }

    /// Builds a party statement from its balance movements.
    ///
    /// Movements are ordered by date, keeping the given order within a day.
    #[must_use]
    pub fn party_statement(
        party: String,
        name: String,
        balance: Decimal,
        mut movements: Vec<PartyMovement>,
    ) -> PartyStatement {
        movements.sort_by_key(|m| m.date);
        let total: Decimal = movements.iter().map(|m| m.amount).sum();
        let opening_balance = balance - total;

        let mut running = opening_balance;
        let lines = movements
            .into_iter()
            .map(|movement| {
                running += movement.amount;
                PartyStatementLine {
                    movement,
                    running_balance: running,
                }
            })
            .collect();

        PartyStatement {
            party,
            name,
            opening_balance,
            lines,
            closing_balance: balance,
        }
    }

    /// Values stock on hand at each item's purchase price.
    pub fn inventory_valuation(
        chart: &ChartOfAccounts,
        roles: &AccountRoles,
        inventory: &Inventory,
    ) -> Result<InventoryValuationReport, LedgerError> {
        let items = inventory
            .iter()
            .filter(|item| !item.is_archived || !item.stock.is_zero())
            .map(|item| {
                Ok(ItemValuation {
                    item_id: item.id,
                    name: item.name.clone(),
                    base_unit: item.base_unit.clone(),
                    stock: item.stock,
                    unit_cost: item.purchase_price,
                    value: item.stock_value()?,
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;
        let total = inventory.valuation()?;
        let recorded_balance = chart.get(roles.inventory)?.balance;
        Ok(InventoryValuationReport {
            items,
            total,
            recorded_balance,
            difference: difference(total, recorded_balance)?,
        })
    }

    /// Compares the party sub-ledgers with their control accounts.
    ///
    /// Customer balances mirror the receivable account; supplier balances
    /// mirror the payable account negated.
    pub fn reconcile_parties(
        chart: &ChartOfAccounts,
        roles: &AccountRoles,
        customers_total: Decimal,
        suppliers_total: Decimal,
    ) -> Result<PartyReconciliation, LedgerError> {
        let receivable_balance = chart.get(roles.receivable)?.balance;
        let payable_balance = -chart.get(roles.payable)?.balance;
        Ok(PartyReconciliation {
            customers_total,
            receivable_balance,
            suppliers_total,
            payable_balance,
            is_reconciled: within_tolerance(customers_total, receivable_balance, STATEMENT_TOLERANCE)
                && within_tolerance(suppliers_total, payable_balance, STATEMENT_TOLERANCE),
        })
    }

    fn section<F>(
        chart: &ChartOfAccounts,
        root: AccountId,
        sign: Decimal,
        leaf_value: &F,
        exclude: Option<AccountId>,
    ) -> Result<StatementSection, LedgerError>
    where
        F: Fn(&Account) -> Decimal,
    {
        let excluded = |id: AccountId| exclude.is_some_and(|branch| chart.is_within(id, branch));
        let mut section = StatementSection::default();
        for (account, depth) in chart.walk(root)? {
            if account.is_archived || excluded(account.id) {
                continue;
            }
            let mut amount = chart.sum_subtree_by(account.id, leaf_value)?;
            if let Some(branch) = exclude.filter(|b| chart.is_within(*b, account.id)) {
                amount = difference(amount, chart.sum_subtree_by(branch, leaf_value)?)?;
            }
            section.accounts.push(StatementLine {
                account_id: account.id,
                code: account.code.clone(),
                name: account.name.clone(),
                depth,
                amount: sign * amount,
            });
        }
        let mut total = chart.sum_subtree_by(root, leaf_value)?;
        if let Some(branch) = exclude {
            total = difference(total, chart.sum_subtree_by(branch, leaf_value)?)?;
        }
        section.total = sign * total;
        Ok(section)
    }
}

fn difference(a: Decimal, b: Decimal) -> Result<Decimal, MoneyError> {
    a.checked_sub(b).ok_or(MoneyError::OutOfRange)
}
