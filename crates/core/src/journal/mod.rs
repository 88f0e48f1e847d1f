//! Journal posting engine.
//!
//! This module owns every journal entry:
//! - Line validation (one-sided positive lines, debits equal credits)
//! - Posting: applying line effects to leaf account balances
//! - Exact reversal and reinstatement of posted entries
//! - The review workflow for manually entered entries

pub mod posting;
pub mod types;
pub mod validation;

#[cfg(test)]
mod posting_props;

pub use posting::{Journal, PreparedEntry};
pub use types::{
    EntryHeader, JournalEntry, JournalLine, JournalSource, JournalStatus, JournalTotals, LineDraft,
};
pub use validation::{LedgerValidationError, validate_lines};
