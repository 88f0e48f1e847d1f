//! Core bookkeeping engine for Mizan.
//!
//! This crate contains pure business logic with no I/O dependencies. Every
//! balance in the books moves through one double-entry posting engine, and
//! every statement is recomputed from leaf balances on demand.
//!
//! # Modules
//!
//! - `chart` - Chart of accounts tree and configured account roles
//! - `journal` - Journal entries and the posting engine
//! - `party` - Customer and supplier sub-ledgers
//! - `inventory` - Items, units, and stock in base units
//! - `trade` - Business documents and the journal lines they produce
//! - `books` - The facade that owns all state and the activity log
//! - `reports` - Trial balance, balance sheet, profit and loss, statements

pub mod books;
pub mod chart;
pub mod error;
pub mod inventory;
pub mod journal;
pub mod party;
pub mod reports;
pub mod sequence;
pub mod trade;

pub use books::{Action, ActivityEntry, ActivityLog, Books, ManualEntryInput, OpeningBalances};
pub use error::{ErrorCategory, LedgerError};
pub use sequence::SequenceGenerator;
