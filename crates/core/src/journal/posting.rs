//! The posting engine.
//!
//! Balances change only through this module. Every entry is validated in full
//! before the first balance moves, so a rejected posting leaves the chart exactly
//! as it was.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use mizan_shared::types::{AccountId, JournalEntryId, MoneyError};

use super::types::{
    EntryHeader, JournalEntry, JournalLine, JournalStatus, JournalTotals, LineDraft,
};
use super::validation::validate_lines;
use crate::chart::ChartOfAccounts;
use crate::error::LedgerError;

const ENTITY: &str = "Journal entry";

/// Lines that passed validation against the current chart.
///
/// Produced by [`Journal::prepare`] and consumed by [`Journal::commit`]; callers
/// prepare every entry an operation needs before committing any of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedEntry {
    lines: Vec<JournalLine>,
    totals: JournalTotals,
}

impl PreparedEntry {
    /// Total debit (equal to total credit).
    #[must_use]
    pub fn totals(&self) -> JournalTotals {
        self.totals
    }
}

/// Store of all journal entries.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: BTreeMap<JournalEntryId, JournalEntry>,
}

impl Journal {
    /// Creates an empty journal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates lines for posting without touching any balance.
    ///
    /// # Errors
    ///
    /// Returns `RejectedPosting` for malformed or unbalanced lines, and an
    /// integrity error if a line names a missing, archived, or non-leaf account.
    pub fn prepare(
        chart: &ChartOfAccounts,
        lines: &[LineDraft],
    ) -> Result<PreparedEntry, LedgerError> {
        let totals = validate_lines(lines).map_err(LedgerError::RejectedPosting)?;
        let lines = resolve_lines(chart, lines)?;
        Ok(PreparedEntry { lines, totals })
    }

    /// Records a prepared entry as posted and applies its lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the chart changed since the entry was prepared so that a
    /// line account can no longer receive postings.
    pub fn commit(
        &mut self,
        chart: &mut ChartOfAccounts,
        id: JournalEntryId,
        header: EntryHeader,
        prepared: PreparedEntry,
    ) -> Result<&JournalEntry, LedgerError> {
        for line in &prepared.lines {
            chart.require_postable(line.account_id)?;
        }
        apply_lines(chart, &prepared.lines, false)?;

        debug!(
            entry = %id,
            source = ?header.source,
            amount = %prepared.totals.debit,
            lines = prepared.lines.len(),
            "Journal entry posted"
        );

        let entry = JournalEntry {
            id,
            date: header.date,
            description: header.description,
            source: header.source,
            debit: prepared.totals.debit,
            credit: prepared.totals.credit,
            status: JournalStatus::Posted,
            lines: prepared.lines,
            is_archived: false,
        };
        self.entries.insert(id, entry);
        self.get(id)
    }

    /// Validates and posts in one step.
    ///
    /// # Errors
    ///
    /// See [`Journal::prepare`].
    pub fn post(
        &mut self,
        chart: &mut ChartOfAccounts,
        id: JournalEntryId,
        header: EntryHeader,
        lines: &[LineDraft],
    ) -> Result<&JournalEntry, LedgerError> {
        let prepared = Self::prepare(chart, lines)?;
        self.commit(chart, id, header, prepared)
    }

    /// Records a manual entry for review. Balances are not touched.
    ///
    /// # Errors
    ///
    /// Returns `InvalidJournal` for malformed or unbalanced lines, and an error if a
    /// line account cannot receive postings.
    pub fn record_for_review(
        &mut self,
        chart: &ChartOfAccounts,
        id: JournalEntryId,
        header: EntryHeader,
        lines: &[LineDraft],
    ) -> Result<&JournalEntry, LedgerError> {
        let totals = validate_lines(lines).map_err(LedgerError::InvalidJournal)?;
        let lines = resolve_lines(chart, lines)?;

        let entry = JournalEntry {
            id,
            date: header.date,
            description: header.description,
            source: header.source,
            debit: totals.debit,
            credit: totals.credit,
            status: JournalStatus::UnderReview,
            lines,
            is_archived: false,
        };
        self.entries.insert(id, entry);
        self.get(id)
    }

    /// Applies an entry that was recorded for review.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing, archived, already posted, or one of
    /// its accounts can no longer receive postings.
    pub fn post_reviewed(
        &mut self,
        chart: &mut ChartOfAccounts,
        id: JournalEntryId,
    ) -> Result<&JournalEntry, LedgerError> {
        let entry = self.get(id)?;
        if entry.is_archived {
            return Err(LedgerError::already_archived(ENTITY, id));
        }
        if entry.status == JournalStatus::Posted {
            return Err(LedgerError::EntryAlreadyPosted(id));
        }
        for line in &entry.lines {
            chart.require_postable(line.account_id)?;
        }

        apply_lines(chart, &entry.lines, false)?;
        let entry = self.get_mut(id)?;
        entry.status = JournalStatus::Posted;
        debug!(entry = %id, amount = %entry.debit, "Reviewed journal entry posted");
        Ok(&*entry)
    }

    /// Archives an entry still under review.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing, archived, or already posted.
    pub fn discard(&mut self, id: JournalEntryId) -> Result<&JournalEntry, LedgerError> {
        let entry = self.get_mut(id)?;
        if entry.is_archived {
            return Err(LedgerError::already_archived(ENTITY, id));
        }
        if entry.status == JournalStatus::Posted {
            return Err(LedgerError::EntryAlreadyPosted(id));
        }
        entry.is_archived = true;
        debug!(entry = %id, "Journal entry discarded");
        Ok(&*entry)
    }

    /// Checks that a posted entry can be reversed.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing, was never posted, or is already
    /// reversed.
    pub fn check_reversal(
        &self,
        chart: &ChartOfAccounts,
        id: JournalEntryId,
    ) -> Result<&JournalEntry, LedgerError> {
        let entry = self.get(id)?;
        if entry.is_archived {
            return Err(LedgerError::EntryAlreadyReversed(id));
        }
        if entry.status != JournalStatus::Posted {
            return Err(LedgerError::EntryNotPosted(id));
        }
        for line in &entry.lines {
            if !chart.get(line.account_id)?.is_leaf() {
                return Err(LedgerError::NotALeaf(line.account_id));
            }
        }
        Ok(&*entry)
    }

    /// Undoes every line of a posted entry and archives it.
    ///
    /// # Errors
    ///
    /// See [`Journal::check_reversal`].
    pub fn reverse(
        &mut self,
        chart: &mut ChartOfAccounts,
        id: JournalEntryId,
    ) -> Result<&JournalEntry, LedgerError> {
        let entry = self.check_reversal(chart, id)?;
        apply_lines(chart, &entry.lines, true)?;

        let entry = self.get_mut(id)?;
        entry.is_archived = true;
        debug!(entry = %id, amount = %entry.debit, "Journal entry reversed");
        Ok(&*entry)
    }

    /// Checks that a reversed entry can be applied again.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is missing, still active, was never posted, or
    /// one of its accounts can no longer receive postings.
    pub fn check_reinstatement(
        &self,
        chart: &ChartOfAccounts,
        id: JournalEntryId,
    ) -> Result<&JournalEntry, LedgerError> {
        let entry = self.get(id)?;
        if !entry.is_archived {
            return Err(LedgerError::not_archived(ENTITY, id));
        }
        if entry.status != JournalStatus::Posted {
            return Err(LedgerError::EntryNotPosted(id));
        }
        for line in &entry.lines {
            chart.require_postable(line.account_id)?;
        }
        Ok(&*entry)
    }

    /// Re-applies the exact lines of a reversed entry.
    ///
    /// # Errors
    ///
    /// See [`Journal::check_reinstatement`].
    pub fn reinstate(
        &mut self,
        chart: &mut ChartOfAccounts,
        id: JournalEntryId,
    ) -> Result<&JournalEntry, LedgerError> {
        let entry = self.check_reinstatement(chart, id)?;
        apply_lines(chart, &entry.lines, false)?;

        let entry = self.get_mut(id)?;
        entry.is_archived = false;
        debug!(entry = %id, amount = %entry.debit, "Journal entry reinstated");
        Ok(&*entry)
    }

    /// Returns true if any active entry (posted or under review) has a line on the
    /// account.
    #[must_use]
    pub fn has_movement(&self, account_id: AccountId) -> bool {
        self.entries
            .values()
            .filter(|e| !e.is_archived)
            .any(|e| e.lines.iter().any(|l| l.account_id == account_id))
    }

    /// Posted, non-archived entries ordered by date then id.
    pub fn effective(&self) -> Vec<&JournalEntry> {
        let mut entries: Vec<&JournalEntry> =
            self.entries.values().filter(|e| e.is_effective()).collect();
        entries.sort_by_key(|e| (e.date, e.id));
        entries
    }

    /// Looks up an entry.
    ///
    /// # Errors
    ///
    /// Returns `EntryNotFound` if no entry has this id.
    pub fn get(&self, id: JournalEntryId) -> Result<&JournalEntry, LedgerError> {
        self.entries.get(&id).ok_or(LedgerError::EntryNotFound(id))
    }

    fn get_mut(&mut self, id: JournalEntryId) -> Result<&mut JournalEntry, LedgerError> {
        self.entries
            .get_mut(&id)
            .ok_or(LedgerError::EntryNotFound(id))
    }

    /// All entries in id order.
    pub fn iter(&self) -> impl Iterator<Item = &JournalEntry> {
        self.entries.values()
    }

    /// Number of entries, archived included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entry was ever recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn resolve_lines(
    chart: &ChartOfAccounts,
    lines: &[LineDraft],
) -> Result<Vec<JournalLine>, LedgerError> {
    lines
        .iter()
        .map(|line| {
            let account = chart.require_postable(line.account_id)?;
            Ok(JournalLine {
                account_id: account.id,
                account_name: account.name.clone(),
                debit: line.debit,
                credit: line.credit,
            })
        })
        .collect()
}

fn apply_lines(
    chart: &mut ChartOfAccounts,
    lines: &[JournalLine],
    reverse: bool,
) -> Result<(), LedgerError> {
    let delta = |line: &JournalLine| {
        if reverse {
            -line.signed_amount()
        } else {
            line.signed_amount()
        }
    };

    // Every resulting balance must fit before the first one moves.
    let mut after: BTreeMap<AccountId, Decimal> = BTreeMap::new();
    for line in lines {
        let current = match after.get(&line.account_id) {
            Some(balance) => *balance,
            None => chart.get(line.account_id)?.balance,
        };
        let next = current
            .checked_add(delta(line))
            .ok_or(MoneyError::OutOfRange)?;
        after.insert(line.account_id, next);
    }

    for line in lines {
        chart.apply_delta(line.account_id, delta(line))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::NewAccount;
    use crate::journal::{JournalSource, LedgerValidationError};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    const CASH: AccountId = AccountId::new(2);
    const SALES: AccountId = AccountId::new(4);

    fn chart() -> ChartOfAccounts {
        let mut chart = ChartOfAccounts::new();
        chart.add_root(AccountId::new(1), "1", "Assets").unwrap();
        chart
            .add_account(CASH, NewAccount::new("Cash", "11", AccountId::new(1)))
            .unwrap();
        chart.add_root(AccountId::new(3), "4", "Revenues").unwrap();
        chart
            .add_account(SALES, NewAccount::new("Sales", "41", AccountId::new(3)))
            .unwrap();
        chart
    }

    fn header() -> EntryHeader {
        EntryHeader {
            date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            description: "Cash sale".to_string(),
            source: JournalSource::Manual,
        }
    }

    fn sale(amount: Decimal) -> Vec<LineDraft> {
        vec![LineDraft::debit(CASH, amount), LineDraft::credit(SALES, amount)]
    }

    #[test]
    fn test_post_moves_leaf_balances() {
        let mut chart = chart();
        let mut journal = Journal::new();
        let entry = journal
            .post(&mut chart, JournalEntryId::new(1), header(), &sale(dec!(250)))
            .unwrap();

        assert_eq!(entry.status, JournalStatus::Posted);
        assert_eq!(entry.debit, dec!(250));
        assert_eq!(entry.lines[0].account_name, "Cash");
        assert_eq!(chart.get(CASH).unwrap().balance, dec!(250));
        assert_eq!(chart.get(SALES).unwrap().balance, dec!(-250));
    }

    #[test]
    fn test_rejected_posting_changes_nothing() {
        let mut chart = chart();
        let mut journal = Journal::new();
        let lines = [LineDraft::debit(CASH, dec!(100)), LineDraft::credit(SALES, dec!(90))];

        let err = journal
            .post(&mut chart, JournalEntryId::new(1), header(), &lines)
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::RejectedPosting(LedgerValidationError::Unbalanced { .. })
        ));
        assert!(journal.is_empty());
        assert_eq!(chart.get(CASH).unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_posting_to_parent_is_rejected() {
        let mut chart = chart();
        let mut journal = Journal::new();
        let lines = [
            LineDraft::debit(AccountId::new(1), dec!(10)),
            LineDraft::credit(SALES, dec!(10)),
        ];
        let err = journal
            .post(&mut chart, JournalEntryId::new(1), header(), &lines)
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotALeaf(_)));
        assert_eq!(chart.get(SALES).unwrap().balance, Decimal::ZERO);
    }

    #[test]
    fn test_reverse_restores_balances() {
        let mut chart = chart();
        let mut journal = Journal::new();
        let id = JournalEntryId::new(1);
        journal.post(&mut chart, id, header(), &sale(dec!(80))).unwrap();

        let entry = journal.reverse(&mut chart, id).unwrap();
        assert!(entry.is_archived);
        assert_eq!(chart.get(CASH).unwrap().balance, Decimal::ZERO);
        assert_eq!(chart.get(SALES).unwrap().balance, Decimal::ZERO);
        assert!(!journal.has_movement(CASH));

        assert!(matches!(
            journal.reverse(&mut chart, id),
            Err(LedgerError::EntryAlreadyReversed(_))
        ));
    }

    #[test]
    fn test_reinstate_reapplies_exact_lines() {
        let mut chart = chart();
        let mut journal = Journal::new();
        let id = JournalEntryId::new(1);
        journal.post(&mut chart, id, header(), &sale(dec!(80))).unwrap();
        journal.reverse(&mut chart, id).unwrap();

        journal.reinstate(&mut chart, id).unwrap();
        assert_eq!(chart.get(CASH).unwrap().balance, dec!(80));
        assert!(journal.has_movement(CASH));
        assert!(matches!(
            journal.reinstate(&mut chart, id),
            Err(LedgerError::NotArchived { .. })
        ));
    }

    #[test]
    fn test_review_workflow() {
        let mut chart = chart();
        let mut journal = Journal::new();
        let id = JournalEntryId::new(7);

        let entry = journal
            .record_for_review(&chart, id, header(), &sale(dec!(40)))
            .unwrap();
        assert_eq!(entry.status, JournalStatus::UnderReview);
        assert_eq!(chart.get(CASH).unwrap().balance, Decimal::ZERO);
        assert!(journal.has_movement(CASH));
        assert!(journal.effective().is_empty());

        journal.post_reviewed(&mut chart, id).unwrap();
        assert_eq!(chart.get(CASH).unwrap().balance, dec!(40));
        assert!(matches!(
            journal.post_reviewed(&mut chart, id),
            Err(LedgerError::EntryAlreadyPosted(_))
        ));
    }

    #[test]
    fn test_review_rejects_unbalanced_as_validation() {
        let chart = chart();
        let mut journal = Journal::new();
        let lines = [LineDraft::debit(CASH, dec!(10))];
        let err = journal
            .record_for_review(&chart, JournalEntryId::new(1), header(), &lines)
            .unwrap_err();
        assert!(matches!(err, LedgerError::InvalidJournal(_)));
    }

    #[test]
    fn test_discard_only_under_review() {
        let mut chart = chart();
        let mut journal = Journal::new();
        let pending = JournalEntryId::new(1);
        let posted = JournalEntryId::new(2);
        journal
            .record_for_review(&chart, pending, header(), &sale(dec!(5)))
            .unwrap();
        journal.post(&mut chart, posted, header(), &sale(dec!(5))).unwrap();

        assert!(journal.discard(pending).unwrap().is_archived);
        assert!(matches!(
            journal.discard(posted),
            Err(LedgerError::EntryAlreadyPosted(_))
        ));
        assert!(matches!(
            journal.reverse(&mut chart, pending),
            Err(LedgerError::EntryAlreadyReversed(_))
        ));
    }

    #[test]
    fn test_unknown_entry() {
        let mut chart = chart();
        let mut journal = Journal::new();
        assert!(matches!(
            journal.reverse(&mut chart, JournalEntryId::new(99)),
            Err(LedgerError::EntryNotFound(_))
        ));
    }
}
