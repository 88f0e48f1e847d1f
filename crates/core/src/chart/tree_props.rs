//! Property-based tests for tree aggregation.
//!
//! A subtree total must equal the sum of the leaf balances beneath it, for any
//! shape of tree, whatever happens to be stored on the parent accounts.

use proptest::prelude::*;
use rust_decimal::Decimal;

use mizan_shared::types::AccountId;

use super::tree::ChartOfAccounts;
use super::types::NewAccount;

/// Strategy for a random tree: for each new node, the index of an earlier node as parent.
fn arb_parent_links(max_nodes: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(any::<prop::sample::Index>(), 1..max_nodes).prop_map(|indices| {
        indices
            .iter()
            .enumerate()
            .map(|(i, index)| index.index(i + 1))
            .collect()
    })
}

fn arb_amount() -> impl Strategy<Value = Decimal> {
    (-1_000_000i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Builds a chart rooted at node 0; node `i + 1` hangs under `links[i]`.
fn build_chart(links: &[usize]) -> ChartOfAccounts {
    let mut chart = ChartOfAccounts::new();
    chart.add_root(AccountId::new(1), "R", "Root").unwrap();
    let mut codes = vec!["R".to_string()];
    for (i, parent) in links.iter().enumerate() {
        let code = format!("{}.{}", codes[*parent], i);
        chart
            .add_account(
                AccountId::new(i as u64 + 2),
                NewAccount {
                    name: format!("Node {i}"),
                    code: code.clone(),
                    parent_id: AccountId::new(*parent as u64 + 1),
                },
            )
            .unwrap();
        codes.push(code);
    }
    chart
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Root total equals the sum of every leaf balance.
    #[test]
    fn prop_root_total_equals_leaf_sum(
        links in arb_parent_links(40),
        amounts in prop::collection::vec(arb_amount(), 41),
    ) {
        let mut chart = build_chart(&links);
        let leaves: Vec<AccountId> = chart.leaves().map(|a| a.id).collect();
        for (id, amount) in leaves.iter().zip(amounts.iter()) {
            chart.apply_delta(*id, *amount).unwrap();
        }

        let expected: Decimal = chart.leaves().map(|a| a.balance).sum();
        prop_assert_eq!(chart.sum_subtree(AccountId::new(1)).unwrap(), expected);
    }

    /// Every intermediate subtree total equals its own leaf sum.
    #[test]
    fn prop_every_subtree_total_equals_its_leaves(
        links in arb_parent_links(30),
        amounts in prop::collection::vec(arb_amount(), 31),
    ) {
        let mut chart = build_chart(&links);
        let leaves: Vec<AccountId> = chart.leaves().map(|a| a.id).collect();
        for (id, amount) in leaves.iter().zip(amounts.iter()) {
            chart.apply_delta(*id, *amount).unwrap();
        }

        let ids: Vec<AccountId> = chart.iter().map(|a| a.id).collect();
        for id in ids {
            let expected: Decimal = chart
                .leaves()
                .filter(|leaf| chart.is_within(leaf.id, id))
                .map(|leaf| leaf.balance)
                .sum();
            prop_assert_eq!(chart.sum_subtree(id).unwrap(), expected);
        }
    }

    /// Totals do not depend on balances stored on parent accounts.
    #[test]
    fn prop_totals_ignore_parent_balances(
        links in arb_parent_links(30),
        amounts in prop::collection::vec(arb_amount(), 31),
        noise in arb_amount(),
    ) {
        let mut chart = build_chart(&links);
        let leaves: Vec<AccountId> = chart.leaves().map(|a| a.id).collect();
        for (id, amount) in leaves.iter().zip(amounts.iter()) {
            chart.apply_delta(*id, *amount).unwrap();
        }
        let before = chart.sum_subtree(AccountId::new(1)).unwrap();

        let mut noisy = chart.clone();
        let parents: Vec<AccountId> = noisy.iter().filter(|a| !a.is_leaf()).map(|a| a.id).collect();
        for id in parents {
            prop_assert!(noisy.set_balance(id, noise).is_err());
            noisy.overwrite_stored_balance(id, noise);
        }
        prop_assert_eq!(noisy.sum_subtree(AccountId::new(1)).unwrap(), before);
    }
}
