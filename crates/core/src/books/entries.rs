//! Manually entered journal entries.

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use mizan_shared::types::JournalEntryId;

use super::{Action, Books, rejected};
use crate::error::LedgerError;
use crate::journal::{
    EntryHeader, JournalEntry, JournalSource, JournalStatus, LineDraft, validate_lines,
};

const ENTITY: &str = "Journal entry";

/// A journal entry as typed in by a user.
#[derive(Debug, Clone, Deserialize)]
pub struct ManualEntryInput {
    /// Entry date.
    pub date: NaiveDate,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Lines; each one-sided and positive, debits equal to credits.
    pub lines: Vec<LineDraft>,
}

impl Books {
    /// Records a manual entry for review. Balances do not move until it is posted.
    ///
    /// # Errors
    ///
    /// Returns `InvalidJournal` for an empty, malformed, or unbalanced entry and an
    /// error if a line account cannot receive postings.
    pub fn add_journal_entry(&mut self, input: ManualEntryInput) -> Result<&JournalEntry, LedgerError> {
        let id = self
            .try_add_journal_entry(input)
            .inspect_err(|e| rejected("add_journal_entry", e))?;
        self.journal.get(id)
    }

    fn try_add_journal_entry(&mut self, input: ManualEntryInput) -> Result<JournalEntryId, LedgerError> {
        let header = EntryHeader {
            date: input.date,
            description: input.description,
            source: JournalSource::Manual,
        };
        validate_lines(&input.lines).map_err(LedgerError::InvalidJournal)?;
        for line in &input.lines {
            self.chart.require_postable(line.account_id)?;
        }

        let id: JournalEntryId = self.sequence.next();
        let entry = self
            .journal
            .record_for_review(&self.chart, id, header, &input.lines)?;
        info!(entry = %id, amount = %entry.debit, "Journal entry recorded for review");
        let detail = format!("amount {}", entry.debit);
        self.record(Action::Created, ENTITY, id, detail);
        Ok(id)
    }

    /// Posts a reviewed manual entry to the account balances.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is unknown, archived, or already posted, or an
    /// account on it can no longer receive postings.
    pub fn post_journal_entry(&mut self, id: JournalEntryId) -> Result<&JournalEntry, LedgerError> {
        self.try_post_journal_entry(id)
            .inspect_err(|e| rejected("post_journal_entry", e))?;
        self.journal.get(id)
    }

    fn try_post_journal_entry(&mut self, id: JournalEntryId) -> Result<(), LedgerError> {
        let entry = self.journal.post_reviewed(&mut self.chart, id)?;
        info!(entry = %id, amount = %entry.debit, "Journal entry posted");
        self.record(Action::Posted, ENTITY, id, "");
        Ok(())
    }

    /// Archives a manual entry: a posted entry is reversed, one under review is
    /// simply withdrawn.
    ///
    /// # Errors
    ///
    /// Returns `EntryOwnedByDocument` for entries created by a business document,
    /// and an error if the entry is unknown or already archived.
    pub fn archive_journal_entry(&mut self, id: JournalEntryId) -> Result<&JournalEntry, LedgerError> {
        self.try_archive_journal_entry(id)
            .inspect_err(|e| rejected("archive_journal_entry", e))?;
        self.journal.get(id)
    }

    fn try_archive_journal_entry(&mut self, id: JournalEntryId) -> Result<(), LedgerError> {
        let entry = self.journal.get(id)?;
        if entry.source.is_document() {
            return Err(LedgerError::EntryOwnedByDocument(id));
        }
        if entry.is_archived {
            return Err(LedgerError::already_archived(ENTITY, id));
        }
        let status = entry.status;
        match status {
            JournalStatus::Posted => {
                self.journal.reverse(&mut self.chart, id)?;
                info!(entry = %id, "Journal entry reversed");
            }
            JournalStatus::UnderReview => {
                self.journal.discard(id)?;
                info!(entry = %id, "Journal entry withdrawn");
            }
        }
        self.record(Action::Archived, ENTITY, id, "");
        Ok(())
    }
}
