//! Property-based tests for the posting engine.
//!
//! Posting keeps the chart in balance, and reversal undoes a posting exactly.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

use mizan_shared::types::{AccountId, JournalEntryId};

use super::posting::Journal;
use super::types::{EntryHeader, JournalSource, LineDraft};
use crate::chart::{ChartOfAccounts, NewAccount};

const LEAVES: u64 = 6;

fn chart() -> ChartOfAccounts {
    let mut chart = ChartOfAccounts::new();
    chart.add_root(AccountId::new(100), "9", "Root").unwrap();
    for i in 0..LEAVES {
        chart
            .add_account(
                AccountId::new(i),
                NewAccount::new(format!("Leaf {i}"), format!("9{i}"), AccountId::new(100)),
            )
            .unwrap();
    }
    chart
}

fn header() -> EntryHeader {
    EntryHeader {
        date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        description: String::new(),
        source: JournalSource::Manual,
    }
}

fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for a balanced entry: several debits and one offsetting credit.
fn balanced_lines() -> impl Strategy<Value = Vec<LineDraft>> {
    (
        prop::collection::vec((0..LEAVES, positive_amount()), 1..5),
        0..LEAVES,
    )
        .prop_map(|(debits, credit_leaf)| {
            let total: Decimal = debits.iter().map(|(_, amount)| *amount).sum();
            let mut lines: Vec<LineDraft> = debits
                .into_iter()
                .map(|(leaf, amount)| LineDraft::debit(AccountId::new(leaf), amount))
                .collect();
            lines.push(LineDraft::credit(AccountId::new(credit_leaf), total));
            lines
        })
}

fn balances(chart: &ChartOfAccounts) -> Vec<Decimal> {
    chart.leaves().map(|a| a.balance).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Leaf balances always sum to zero after any sequence of postings.
    #[test]
    fn prop_postings_keep_chart_balanced(
        entries in prop::collection::vec(balanced_lines(), 1..10),
    ) {
        let mut chart = chart();
        let mut journal = Journal::new();
        for (i, lines) in entries.iter().enumerate() {
            journal
                .post(&mut chart, JournalEntryId::new(i as u64 + 1), header(), lines)
                .unwrap();
        }
        let total: Decimal = balances(&chart).into_iter().sum();
        prop_assert_eq!(total, Decimal::ZERO);
        prop_assert_eq!(chart.sum_subtree(AccountId::new(100)).unwrap(), Decimal::ZERO);
    }

    /// Reversing every entry, in any order, restores the starting balances exactly.
    #[test]
    fn prop_reversal_undoes_posting(
        entries in prop::collection::vec(balanced_lines(), 1..10),
        order in any::<u64>(),
    ) {
        let mut chart = chart();
        let before = balances(&chart);
        let mut journal = Journal::new();
        let mut ids: Vec<JournalEntryId> = Vec::new();
        for (i, lines) in entries.iter().enumerate() {
            let id = JournalEntryId::new(i as u64 + 1);
            journal.post(&mut chart, id, header(), lines).unwrap();
            ids.push(id);
        }

        let len = ids.len();
        ids.rotate_left(usize::try_from(order % len as u64).unwrap());
        for id in ids {
            journal.reverse(&mut chart, id).unwrap();
        }
        prop_assert_eq!(balances(&chart), before);
        prop_assert!(journal.effective().is_empty());
    }

    /// An unbalanced entry is rejected and leaves every balance untouched.
    #[test]
    fn prop_unbalanced_rejected_atomically(
        seed in balanced_lines(),
        lines in balanced_lines(),
        skew in positive_amount(),
    ) {
        let mut chart = chart();
        let mut journal = Journal::new();
        journal.post(&mut chart, JournalEntryId::new(1), header(), &seed).unwrap();
        let before = balances(&chart);

        let mut lines = lines;
        if let Some(last) = lines.last_mut() {
            last.credit += skew;
        }
        let result = journal.post(&mut chart, JournalEntryId::new(2), header(), &lines);
        prop_assert!(result.is_err());
        prop_assert_eq!(balances(&chart), before);
        prop_assert_eq!(journal.len(), 1);
    }
}
