//! Party domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mizan_shared::types::{CustomerId, SupplierId};

/// A customer or supplier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party<Id> {
    /// Identifier.
    pub id: Id,
    /// Display name.
    pub name: String,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Postal address.
    pub address: Option<String>,
    /// Signed running balance.
    pub balance: Decimal,
    /// Soft-delete flag.
    pub is_archived: bool,
}

/// A customer; positive balance means the customer owes us.
pub type Customer = Party<CustomerId>;

/// A supplier; positive balance means we owe the supplier.
pub type Supplier = Party<SupplierId>;

/// Input for adding a customer or supplier.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewParty {
    /// Display name.
    pub name: String,
    /// Phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
}

/// Contact fields that may be edited. The balance never is.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartyPatch {
    /// New name.
    pub name: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New postal address.
    pub address: Option<String>,
}

/// A balance movement on one party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyDelta {
    /// Customer balance change.
    Customer(CustomerId, Decimal),
    /// Supplier balance change.
    Supplier(SupplierId, Decimal),
}

impl PartyDelta {
    /// The opposite movement.
    #[must_use]
    pub fn negated(self) -> Self {
        match self {
            Self::Customer(id, amount) => Self::Customer(id, -amount),
            Self::Supplier(id, amount) => Self::Supplier(id, -amount),
        }
    }

    /// The signed amount.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        match self {
            Self::Customer(_, amount) | Self::Supplier(_, amount) => *amount,
        }
    }
}
