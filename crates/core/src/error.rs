//! Bookkeeping error types.
//!
//! Every operation on the books either succeeds completely or fails with one of
//! these errors without touching any balance. Each variant belongs to exactly one
//! [`ErrorCategory`]: bad input, a rule that forbids the operation in the current
//! state, or a caller bug the engine refused to act on.

use rust_decimal::Decimal;
use thiserror::Error;

use mizan_shared::AppError;
use mizan_shared::types::{AccountId, ItemId, JournalEntryId, MoneyError, PackingUnitId};

use crate::journal::LedgerValidationError;

/// Error taxonomy surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Input is incomplete or invalid.
    Validation,
    /// The operation conflicts with the current state of the books.
    Conflict,
    /// A referenced record is missing or the engine was handed inconsistent data.
    Integrity,
}

/// Errors that can occur while operating on the books.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// A required field is missing or blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A manually entered journal entry is malformed.
    #[error("Invalid journal entry: {0}")]
    InvalidJournal(LedgerValidationError),

    /// A document has no line items.
    #[error("Document must have at least one line item")]
    NoLineItems,

    /// Line quantity is zero or negative.
    #[error("Quantity for item {item} must be greater than zero")]
    NonPositiveQuantity {
        /// The offending item.
        item: ItemId,
    },

    /// A price or cost is negative.
    #[error("Price cannot be negative")]
    NegativePrice,

    /// A voucher amount or document total is zero or negative.
    #[error("Amount must be greater than zero")]
    NonPositiveAmount,

    /// A packing unit factor is zero or negative.
    #[error("Packing unit factor must be greater than zero")]
    InvalidFactor,

    /// Packing unit does not belong to the item.
    #[error("Packing unit {unit} is not defined for item {item}")]
    UnknownPackingUnit {
        /// The item.
        item: ItemId,
        /// The unit requested.
        unit: PackingUnitId,
    },

    /// Unit name is not registered.
    #[error("Unit {0:?} is not defined")]
    UnknownUnit(String),

    /// Unit name already registered.
    #[error("Unit {0:?} already exists")]
    DuplicateUnit(String),

    /// Account code already in use.
    #[error("Account code {0} already exists")]
    DuplicateAccountCode(String),

    /// Account name already in use.
    #[error("Account name {0:?} already exists")]
    DuplicateAccountName(String),

    /// Account code does not extend its parent's code.
    #[error("Account code {code} must extend parent code {parent_code}")]
    InvalidAccountCode {
        /// The rejected code.
        code: String,
        /// The parent's code.
        parent_code: String,
    },

    /// Treasury voucher names an account outside the treasury group.
    #[error("Account {0} is not a treasury account")]
    NotATreasury(AccountId),

    /// A transfer names the same treasury on both sides.
    #[error("Cannot transfer funds from a treasury to itself")]
    SameTreasury,

    /// An inventory adjustment names the inventory account as its contra side.
    #[error("Adjustment contra account cannot be the inventory account")]
    ContraIsInventory,

    /// Boundary value could not be parsed.
    #[error(transparent)]
    Money(#[from] MoneyError),

    // ========== Conflict Errors ==========
    /// Account still carries a balance.
    #[error("Account {id} has a balance of {balance}")]
    AccountHasBalance {
        /// The account.
        id: AccountId,
        /// Its current balance.
        balance: Decimal,
    },

    /// Account has recorded journal movements.
    #[error("Account {0} has recorded movements")]
    AccountHasMovements(AccountId),

    /// Account still has active children.
    #[error("Account {0} has active sub-accounts")]
    AccountHasActiveChildren(AccountId),

    /// Account is archived and cannot be used.
    #[error("Account {0} is archived")]
    AccountArchived(AccountId),

    /// Account is a statement root or a configured posting account.
    #[error("Account {0} is reserved by the system")]
    ProtectedAccount(AccountId),

    /// Entity is already archived.
    #[error("{entity} {id} is already archived")]
    AlreadyArchived {
        /// Entity name.
        entity: &'static str,
        /// Display id.
        id: String,
    },

    /// Entity is not archived.
    #[error("{entity} {id} is not archived")]
    NotArchived {
        /// Entity name.
        entity: &'static str,
        /// Display id.
        id: String,
    },

    /// Customer, supplier, or item is archived and cannot be used.
    #[error("{entity} {id} is archived")]
    EntityArchived {
        /// Entity name.
        entity: &'static str,
        /// Display id.
        id: String,
    },

    /// Stock would go below zero.
    #[error("Insufficient stock for item {item}: available {available}, requested {requested}")]
    InsufficientStock {
        /// The item.
        item: ItemId,
        /// Stock on hand in base units.
        available: Decimal,
        /// Quantity requested in base units.
        requested: Decimal,
    },

    /// Customer or supplier still carries a balance.
    #[error("{entity} {id} has a balance of {balance}")]
    PartyHasBalance {
        /// Entity name.
        entity: &'static str,
        /// Display id.
        id: String,
        /// Current balance.
        balance: Decimal,
    },

    /// Item still has stock on hand.
    #[error("Item {item} still has {stock} in stock")]
    ItemHasStock {
        /// The item.
        item: ItemId,
        /// Stock on hand.
        stock: Decimal,
    },

    /// Journal entry has already been posted.
    #[error("Journal entry {0} is already posted")]
    EntryAlreadyPosted(JournalEntryId),

    /// Journal entry has already been reversed.
    #[error("Journal entry {0} has already been reversed")]
    EntryAlreadyReversed(JournalEntryId),

    /// Journal entry belongs to a business document.
    #[error("Journal entry {0} belongs to a document; archive the document instead")]
    EntryOwnedByDocument(JournalEntryId),

    // ========== Integrity Errors ==========
    /// Journal lines rejected by the posting engine.
    #[error("Posting rejected: {0}")]
    RejectedPosting(LedgerValidationError),

    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(AccountId),

    /// No account with the configured code.
    #[error("No account with code {0}")]
    AccountCodeNotFound(String),

    /// Account has children and cannot carry a balance.
    #[error("Account {0} is not a leaf account")]
    NotALeaf(AccountId),

    /// Journal entry not found.
    #[error("Journal entry not found: {0}")]
    EntryNotFound(JournalEntryId),

    /// Journal entry was never posted.
    #[error("Journal entry {0} has not been posted")]
    EntryNotPosted(JournalEntryId),

    /// Referenced record not found.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Entity name.
        entity: &'static str,
        /// Display id.
        id: String,
    },
}

impl LedgerError {
    /// Builds a not-found error for any displayable id.
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Builds an already-archived error for any displayable id.
    pub fn already_archived(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::AlreadyArchived {
            entity,
            id: id.to_string(),
        }
    }

    /// Builds a not-archived error for any displayable id.
    pub fn not_archived(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotArchived {
            entity,
            id: id.to_string(),
        }
    }

    /// Builds an archived-entity error for any displayable id.
    pub fn entity_archived(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::EntityArchived {
            entity,
            id: id.to_string(),
        }
    }

    /// Returns the taxonomy category of this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingField(_)
            | Self::InvalidJournal(_)
            | Self::NoLineItems
            | Self::NonPositiveQuantity { .. }
            | Self::NegativePrice
            | Self::NonPositiveAmount
            | Self::InvalidFactor
            | Self::UnknownPackingUnit { .. }
            | Self::UnknownUnit(_)
            | Self::DuplicateUnit(_)
            | Self::DuplicateAccountCode(_)
            | Self::DuplicateAccountName(_)
            | Self::InvalidAccountCode { .. }
            | Self::NotATreasury(_)
            | Self::SameTreasury
            | Self::ContraIsInventory
            | Self::Money(_) => ErrorCategory::Validation,

            Self::AccountHasBalance { .. }
            | Self::AccountHasMovements(_)
            | Self::AccountHasActiveChildren(_)
            | Self::AccountArchived(_)
            | Self::ProtectedAccount(_)
            | Self::AlreadyArchived { .. }
            | Self::NotArchived { .. }
            | Self::EntityArchived { .. }
            | Self::InsufficientStock { .. }
            | Self::PartyHasBalance { .. }
            | Self::ItemHasStock { .. }
            | Self::EntryAlreadyPosted(_)
            | Self::EntryAlreadyReversed(_)
            | Self::EntryOwnedByDocument(_) => ErrorCategory::Conflict,

            Self::RejectedPosting(_)
            | Self::AccountNotFound(_)
            | Self::AccountCodeNotFound(_)
            | Self::NotALeaf(_)
            | Self::EntryNotFound(_)
            | Self::EntryNotPosted(_)
            | Self::NotFound { .. } => ErrorCategory::Integrity,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidJournal(_) => "INVALID_JOURNAL",
            Self::NoLineItems => "NO_LINE_ITEMS",
            Self::NonPositiveQuantity { .. } => "NON_POSITIVE_QUANTITY",
            Self::NegativePrice => "NEGATIVE_PRICE",
            Self::NonPositiveAmount => "NON_POSITIVE_AMOUNT",
            Self::InvalidFactor => "INVALID_FACTOR",
            Self::UnknownPackingUnit { .. } => "UNKNOWN_PACKING_UNIT",
            Self::UnknownUnit(_) => "UNKNOWN_UNIT",
            Self::DuplicateUnit(_) => "DUPLICATE_UNIT",
            Self::DuplicateAccountCode(_) => "DUPLICATE_ACCOUNT_CODE",
            Self::DuplicateAccountName(_) => "DUPLICATE_ACCOUNT_NAME",
            Self::InvalidAccountCode { .. } => "INVALID_ACCOUNT_CODE",
            Self::NotATreasury(_) => "NOT_A_TREASURY",
            Self::SameTreasury => "SAME_TREASURY",
            Self::ContraIsInventory => "CONTRA_IS_INVENTORY",
            Self::Money(_) => "INVALID_NUMBER",
            Self::AccountHasBalance { .. } => "ACCOUNT_HAS_BALANCE",
            Self::AccountHasMovements(_) => "ACCOUNT_HAS_MOVEMENTS",
            Self::AccountHasActiveChildren(_) => "ACCOUNT_HAS_ACTIVE_CHILDREN",
            Self::AccountArchived(_) => "ACCOUNT_ARCHIVED",
            Self::ProtectedAccount(_) => "PROTECTED_ACCOUNT",
            Self::AlreadyArchived { .. } => "ALREADY_ARCHIVED",
            Self::NotArchived { .. } => "NOT_ARCHIVED",
            Self::EntityArchived { .. } => "ENTITY_ARCHIVED",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::PartyHasBalance { .. } => "PARTY_HAS_BALANCE",
            Self::ItemHasStock { .. } => "ITEM_HAS_STOCK",
            Self::EntryAlreadyPosted(_) => "ENTRY_ALREADY_POSTED",
            Self::EntryAlreadyReversed(_) => "ENTRY_ALREADY_REVERSED",
            Self::EntryOwnedByDocument(_) => "ENTRY_OWNED_BY_DOCUMENT",
            Self::RejectedPosting(_) => "REJECTED_POSTING",
            Self::AccountNotFound(_) => "ACCOUNT_NOT_FOUND",
            Self::AccountCodeNotFound(_) => "ACCOUNT_CODE_NOT_FOUND",
            Self::NotALeaf(_) => "NOT_A_LEAF",
            Self::EntryNotFound(_) => "ENTRY_NOT_FOUND",
            Self::EntryNotPosted(_) => "ENTRY_NOT_POSTED",
            Self::NotFound { .. } => "NOT_FOUND",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Validation => 400,
            ErrorCategory::Conflict => 409,
            ErrorCategory::Integrity => 500,
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err.category() {
            ErrorCategory::Validation => Self::Validation(err.to_string()),
            ErrorCategory::Conflict => Self::Conflict(err.to_string()),
            ErrorCategory::Integrity => Self::Integrity(err.to_string()),
        }
    }
}
