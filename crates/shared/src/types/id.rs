//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `SaleId` where a `PurchaseId` is expected.
//! Every ID is a sequence number handed out by the core's sequence generator; its display
//! form carries a per-type prefix so that printed documents stay human-readable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when a displayed ID cannot be parsed back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid {kind} id: {input:?}")]
pub struct IdParseError {
    /// The expected ID type.
    pub kind: &'static str,
    /// The rejected input.
    pub input: String,
}

/// Behaviour shared by every sequential ID.
pub trait SequentialId: Copy + Eq + std::hash::Hash + std::fmt::Display {
    /// Prefix used in the display form (e.g. `JE`).
    const PREFIX: &'static str;

    /// Builds the ID from a raw sequence number.
    fn from_seq(seq: u64) -> Self;

    /// Returns the raw sequence number.
    fn seq(self) -> u64;
}

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $prefix:literal, $doc:expr) => {
        #[doc = $doc]
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Creates an ID from a raw sequence number.
            #[must_use]
            pub const fn new(seq: u64) -> Self {
                Self(seq)
            }

            /// Returns the inner sequence number.
            #[must_use]
            pub const fn into_inner(self) -> u64 {
                self.0
            }
        }

        impl SequentialId for $name {
            const PREFIX: &'static str = $prefix;

            fn from_seq(seq: u64) -> Self {
                Self(seq)
            }

            fn seq(self) -> u64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}-{:06}", $prefix, self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.strip_prefix($prefix)
                    .and_then(|rest| rest.strip_prefix('-'))
                    .and_then(|digits| digits.parse::<u64>().ok())
                    .map(Self)
                    .ok_or_else(|| IdParseError {
                        kind: stringify!($name),
                        input: s.to_string(),
                    })
            }
        }
    };
}

typed_id!(AccountId, "ACC", "Unique identifier for a chart of accounts entry.");
typed_id!(JournalEntryId, "JE", "Unique identifier for a journal entry.");
typed_id!(SaleId, "SAL", "Unique identifier for a sale invoice.");
typed_id!(PurchaseId, "PUR", "Unique identifier for a purchase invoice.");
typed_id!(SaleReturnId, "SRT", "Unique identifier for a sale return.");
typed_id!(PurchaseReturnId, "PRT", "Unique identifier for a purchase return.");
typed_id!(AdjustmentId, "ADJ", "Unique identifier for an inventory adjustment.");
typed_id!(TreasuryId, "TRS", "Unique identifier for a treasury voucher.");
typed_id!(CustomerId, "CUS", "Unique identifier for a customer.");
typed_id!(SupplierId, "SUP", "Unique identifier for a supplier.");
typed_id!(ItemId, "ITM", "Unique identifier for an inventory item.");
typed_id!(PackingUnitId, "PKU", "Unique identifier for an item's packing unit.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_display_is_prefixed_and_padded() {
        assert_eq!(JournalEntryId::new(42).to_string(), "JE-000042");
        assert_eq!(SaleId::new(7).to_string(), "SAL-000007");
        assert_eq!(ItemId::new(1_234_567).to_string(), "ITM-1234567");
    }

    #[test]
    fn test_from_str_round_trips_display() {
        let id = PurchaseReturnId::new(31);
        assert_eq!(PurchaseReturnId::from_str(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn test_from_str_rejects_foreign_prefix() {
        let err = SaleId::from_str("PUR-000001").unwrap_err();
        assert_eq!(err.kind, "SaleId");
        assert!(SaleId::from_str("SAL-abc").is_err());
        assert!(SaleId::from_str("").is_err());
    }

    #[test]
    fn test_ordering_follows_sequence() {
        assert!(AccountId::new(2) > AccountId::new(1));
        assert_eq!(AccountId::from_seq(9).seq(), 9);
    }

    #[test]
    fn test_serde_is_transparent() {
        assert_eq!(CustomerId::new(5).into_inner(), 5);
    }
}
