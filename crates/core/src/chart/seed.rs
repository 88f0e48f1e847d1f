//! Default chart of accounts for a small trading business.

use mizan_shared::types::AccountId;

use super::tree::ChartOfAccounts;
use super::types::NewAccount;
use crate::error::LedgerError;
use crate::sequence::SequenceGenerator;

/// `(code, name)` pairs; the parent of each account is the longest listed prefix of its code.
const DEFAULT_ACCOUNTS: &[(&str, &str)] = &[
    ("1", "Assets"),
    ("11", "Current Assets"),
    ("111", "Treasury"),
    ("1111", "Main Cash Box"),
    ("1112", "Bank"),
    ("112", "Accounts Receivable"),
    ("113", "Inventory"),
    ("12", "Fixed Assets"),
    ("121", "Equipment"),
    ("2", "Liabilities"),
    ("21", "Current Liabilities"),
    ("211", "Accounts Payable"),
    ("212", "Accrued Expenses"),
    ("3", "Equity"),
    ("31", "Owner's Capital"),
    ("32", "Retained Earnings"),
    ("4", "Revenues & Expenses"),
    ("41", "Revenues"),
    ("411", "Sales Revenue"),
    ("412", "Other Revenue"),
    ("413", "Inventory Gains"),
    ("42", "Operating Expenses"),
    ("421", "Cost of Goods Sold"),
    ("422", "Salaries"),
    ("423", "Rent"),
    ("424", "Inventory Shortage"),
];

/// Builds the default chart, drawing account ids from `seq`.
pub fn default_chart(seq: &SequenceGenerator) -> Result<ChartOfAccounts, LedgerError> {
    let mut chart = ChartOfAccounts::new();
    for (code, name) in DEFAULT_ACCOUNTS {
        let parent = (1..code.len())
            .rev()
            .find_map(|len| chart.find_by_code(&code[..len]).ok())
            .map(|parent| parent.id);
        let id: AccountId = seq.next();
        match parent {
            Some(parent_id) => {
                chart.add_account(
                    id,
                    NewAccount {
                        name: (*name).to_string(),
                        code: (*code).to_string(),
                        parent_id,
                    },
                )?;
            }
            None => {
                chart.add_root(id, code, name)?;
            }
        }
    }
    Ok(chart)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mizan_shared::LedgerSettings;

    #[test]
    fn test_default_chart_has_four_statement_roots() {
        let chart = default_chart(&SequenceGenerator::new()).unwrap();
        let roots: Vec<&str> = chart
            .roots()
            .iter()
            .map(|id| chart.get(*id).unwrap().code.as_str())
            .collect();
        assert_eq!(roots, vec!["1", "2", "3", "4"]);
        assert_eq!(chart.len(), DEFAULT_ACCOUNTS.len());
    }

    #[test]
    fn test_default_posting_accounts_exist() {
        let chart = default_chart(&SequenceGenerator::new()).unwrap();
        let settings = LedgerSettings::default();
        for code in [
            &settings.accounts.default_treasury,
            &settings.accounts.receivable,
            &settings.accounts.inventory,
            &settings.accounts.payable,
            &settings.accounts.sales_revenue,
            &settings.accounts.cost_of_goods_sold,
        ] {
            assert!(chart.find_by_code(code).unwrap().is_leaf(), "{code} must be a leaf");
        }
        assert!(!chart.find_by_code(&settings.accounts.treasury_group).unwrap().is_leaf());
    }

    #[test]
    fn test_default_chart_nests_by_code_prefix() {
        let chart = default_chart(&SequenceGenerator::new()).unwrap();
        let cash = chart.find_by_code("1111").unwrap();
        let treasury = chart.find_by_code("111").unwrap();
        assert_eq!(cash.parent_id, Some(treasury.id));
    }
}
