//! Accounts the books post to and report from, resolved from configured codes.

use mizan_shared::LedgerSettings;
use mizan_shared::types::AccountId;

use super::tree::ChartOfAccounts;
use crate::error::LedgerError;

/// Configured account codes resolved to ids.
///
/// Resolution happens once, so recoding an account later does not move any
/// posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountRoles {
    /// Group whose leaves are treasuries.
    pub treasury_group: AccountId,
    /// Treasury used by cash documents that name none.
    pub default_treasury: AccountId,
    /// Customers control account.
    pub receivable: AccountId,
    /// Inventory control account.
    pub inventory: AccountId,
    /// Suppliers control account.
    pub payable: AccountId,
    /// Sales revenue.
    pub sales_revenue: AccountId,
    /// Cost of goods sold.
    pub cost_of_goods_sold: AccountId,
    /// Assets root.
    pub assets: AccountId,
    /// Liabilities root.
    pub liabilities: AccountId,
    /// Equity root.
    pub equity: AccountId,
    /// Revenues and expenses root.
    pub revenue_and_expenses: AccountId,
    /// Operating expenses branch.
    pub operating_expenses: AccountId,
}

impl AccountRoles {
    /// Resolves every configured code against `chart`.
    ///
    /// # Errors
    ///
    /// Returns an error if a code is missing, a posting account is not an active
    /// leaf, or the default treasury lies outside the treasury group.
    pub fn resolve(chart: &ChartOfAccounts, settings: &LedgerSettings) -> Result<Self, LedgerError> {
        let accounts = &settings.accounts;
        let layout = &settings.chart;
        let code = |code: &str| chart.find_by_code(code).map(|a| a.id);
        let leaf = |code: &str| -> Result<AccountId, LedgerError> {
            let id = chart.find_by_code(code)?.id;
            chart.require_postable(id)?;
            Ok(id)
        };

        let roles = Self {
            treasury_group: code(&accounts.treasury_group)?,
            default_treasury: leaf(&accounts.default_treasury)?,
            receivable: leaf(&accounts.receivable)?,
            inventory: leaf(&accounts.inventory)?,
            payable: leaf(&accounts.payable)?,
            sales_revenue: leaf(&accounts.sales_revenue)?,
            cost_of_goods_sold: leaf(&accounts.cost_of_goods_sold)?,
            assets: code(&layout.assets)?,
            liabilities: code(&layout.liabilities)?,
            equity: code(&layout.equity)?,
            revenue_and_expenses: code(&layout.revenue_and_expenses)?,
            operating_expenses: code(&layout.operating_expenses)?,
        };
        if !roles.is_treasury(chart, roles.default_treasury) {
            return Err(LedgerError::NotATreasury(roles.default_treasury));
        }
        Ok(roles)
    }

    /// Returns true if the account is reserved and may not be archived.
    #[must_use]
    pub fn is_protected(&self, id: AccountId) -> bool {
        [
            self.treasury_group,
            self.default_treasury,
            self.receivable,
            self.inventory,
            self.payable,
            self.sales_revenue,
            self.cost_of_goods_sold,
            self.assets,
            self.liabilities,
            self.equity,
            self.revenue_and_expenses,
            self.operating_expenses,
        ]
        .contains(&id)
    }

    /// Returns true if the account is a leaf inside the treasury group.
    #[must_use]
    pub fn is_treasury(&self, chart: &ChartOfAccounts, id: AccountId) -> bool {
        id != self.treasury_group
            && chart.is_within(id, self.treasury_group)
            && chart.get(id).is_ok_and(|a| a.is_leaf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::default_chart;
    use crate::sequence::SequenceGenerator;

    #[test]
    fn test_resolves_default_settings() {
        let chart = default_chart(&SequenceGenerator::new()).unwrap();
        let roles = AccountRoles::resolve(&chart, &LedgerSettings::default()).unwrap();

        assert_eq!(chart.get(roles.receivable).unwrap().code, "112");
        assert_eq!(chart.get(roles.operating_expenses).unwrap().code, "42");
        assert!(roles.is_protected(roles.assets));
        assert!(roles.is_treasury(&chart, roles.default_treasury));
        assert!(!roles.is_treasury(&chart, roles.treasury_group));
        assert!(!roles.is_treasury(&chart, roles.receivable));
    }

    #[test]
    fn test_posting_account_must_be_leaf() {
        let chart = default_chart(&SequenceGenerator::new()).unwrap();
        let mut settings = LedgerSettings::default();
        settings.accounts.receivable = "11".to_string();
        assert!(matches!(
            AccountRoles::resolve(&chart, &settings),
            Err(LedgerError::NotALeaf(_))
        ));
    }

    #[test]
    fn test_unknown_code() {
        let chart = default_chart(&SequenceGenerator::new()).unwrap();
        let mut settings = LedgerSettings::default();
        settings.chart.equity = "9".to_string();
        assert!(matches!(
            AccountRoles::resolve(&chart, &settings),
            Err(LedgerError::AccountCodeNotFound(_))
        ));
    }
}
