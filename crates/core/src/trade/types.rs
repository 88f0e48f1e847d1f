//! Sales, purchases, and their returns.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use mizan_shared::types::{
    AccountId, CustomerId, ItemId, JournalEntryId, PurchaseId, PurchaseReturnId, SaleId,
    SaleReturnId, SupplierId,
};

use crate::inventory::UnitRef;
use crate::journal::JournalSource;
use crate::party::PartyDelta;
use crate::sequence::Sequenced;

/// The four trade document types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Goods sold to a customer.
    Sale,
    /// Goods bought from a supplier.
    Purchase,
    /// Goods returned by a customer.
    SaleReturn,
    /// Goods returned to a supplier.
    PurchaseReturn,
}

impl DocumentKind {
    /// Entity name used in messages.
    #[must_use]
    pub fn entity(self) -> &'static str {
        match self {
            Self::Sale => "Sale",
            Self::Purchase => "Purchase",
            Self::SaleReturn => "Sale return",
            Self::PurchaseReturn => "Purchase return",
        }
    }

    /// Name of the field holding the party.
    #[must_use]
    pub fn party_field(self) -> &'static str {
        if self.is_customer_side() {
            "customer"
        } else {
            "supplier"
        }
    }

    /// True for sales and sale returns.
    #[must_use]
    pub fn is_customer_side(self) -> bool {
        matches!(self, Self::Sale | Self::SaleReturn)
    }

    /// True for documents that undo an earlier trade.
    #[must_use]
    pub fn is_return(self) -> bool {
        matches!(self, Self::SaleReturn | Self::PurchaseReturn)
    }

    /// True if the document brings goods into stock.
    #[must_use]
    pub fn is_stock_inflow(self) -> bool {
        matches!(self, Self::Purchase | Self::SaleReturn)
    }
}

/// Compile-time description of a trade document type.
pub trait TradeKind: Sized + 'static {
    /// Document identifier.
    type Id: Sequenced + Serialize + DeserializeOwned;
    /// Counterparty identifier.
    type PartyId: Sequenced + Serialize + DeserializeOwned;
    /// Runtime tag.
    const KIND: DocumentKind;

    /// Journal source for a document of this type.
    fn source(id: Self::Id) -> JournalSource;

    /// Party balance movement of `amount`.
    fn party_delta(party: Self::PartyId, amount: Decimal) -> PartyDelta;
}

macro_rules! trade_kind {
    ($marker:ident, $id:ty, $party:ty, $kind:ident, $delta:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum $marker {}

        impl TradeKind for $marker {
            type Id = $id;
            type PartyId = $party;
            const KIND: DocumentKind = DocumentKind::$kind;

            fn source(id: Self::Id) -> JournalSource {
                JournalSource::$kind(id)
            }

            fn party_delta(party: Self::PartyId, amount: Decimal) -> PartyDelta {
                PartyDelta::$delta(party, amount)
            }
        }
    };
}

trade_kind!(SaleKind, SaleId, CustomerId, Sale, Customer, "Sale invoices.");
trade_kind!(PurchaseKind, PurchaseId, SupplierId, Purchase, Supplier, "Purchase invoices.");
trade_kind!(SaleReturnKind, SaleReturnId, CustomerId, SaleReturn, Customer, "Sale returns.");
trade_kind!(
    PurchaseReturnKind,
    PurchaseReturnId,
    SupplierId,
    PurchaseReturn,
    Supplier,
    "Purchase returns."
);

/// How a document is paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Settlement {
    /// Posted to the receivable or payable control account; the party balance moves.
    #[default]
    OnAccount,
    /// Paid through a treasury account; the party balance is unchanged.
    Cash {
        /// Treasury leaf; the configured default when absent.
        #[serde(default)]
        treasury: Option<AccountId>,
    },
}

/// A document line as entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LineItemInput {
    /// The item.
    pub item_id: ItemId,
    /// Unit the quantity and price are expressed in.
    #[serde(default)]
    pub unit: UnitRef,
    /// Quantity in `unit`.
    pub quantity: Decimal,
    /// Price per `unit`.
    pub price: Decimal,
}

/// A validated document line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// The item.
    pub item_id: ItemId,
    /// Item name when the document was recorded.
    pub item_name: String,
    /// Unit the quantity and price are expressed in.
    pub unit: UnitRef,
    /// Unit name when the document was recorded.
    pub unit_name: String,
    /// Quantity in `unit`.
    pub quantity: Decimal,
    /// Price per `unit`.
    pub price: Decimal,
    /// `quantity × price`.
    pub total: Decimal,
    /// Quantity in base units.
    pub base_quantity: Decimal,
    /// Purchase price per base unit when the document was recorded.
    pub unit_cost: Decimal,
}

impl LineItem {
    /// Stock cost of the line.
    #[must_use]
    pub fn cost(&self) -> Decimal {
        self.base_quantity * self.unit_cost
    }
}

/// Input for creating or updating a trade document.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeInput<P> {
    /// Document date.
    pub date: NaiveDate,
    /// Customer or supplier. Required unless settled in cash.
    #[serde(default)]
    pub party: Option<P>,
    /// Payment terms.
    #[serde(default)]
    pub settlement: Settlement,
    /// Lines.
    pub lines: Vec<LineItemInput>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: String,
}

/// Input for a sale.
pub type SaleInput = TradeInput<CustomerId>;
/// Input for a purchase.
pub type PurchaseInput = TradeInput<SupplierId>;
/// Input for a sale return.
pub type SaleReturnInput = TradeInput<CustomerId>;
/// Input for a purchase return.
pub type PurchaseReturnInput = TradeInput<SupplierId>;

/// The business content of a trade document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeTerms<P> {
    /// Document date.
    pub date: NaiveDate,
    /// Customer or supplier.
    pub party: Option<P>,
    /// Payment terms, with the treasury resolved for cash documents.
    pub settlement: Settlement,
    /// Lines.
    pub lines: Vec<LineItem>,
    /// Sum of line totals.
    pub total: Decimal,
    /// Free-text notes.
    pub notes: String,
}

impl<P> TradeTerms<P> {
    /// Stock cost of all lines.
    #[must_use]
    pub fn cost(&self) -> Decimal {
        self.lines.iter().map(LineItem::cost).sum()
    }
}

/// A recorded sale, purchase, or return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(bound = "")]
pub struct TradeDocument<K: TradeKind> {
    /// Identifier.
    pub id: K::Id,
    /// The journal entry carrying the financial effect.
    pub journal_entry_id: JournalEntryId,
    /// Business content.
    #[serde(flatten)]
    pub terms: TradeTerms<K::PartyId>,
    /// Soft-delete flag.
    pub is_archived: bool,
}

/// A sale invoice.
pub type Sale = TradeDocument<SaleKind>;
/// A purchase invoice.
pub type Purchase = TradeDocument<PurchaseKind>;
/// A sale return.
pub type SaleReturn = TradeDocument<SaleReturnKind>;
/// A purchase return.
pub type PurchaseReturn = TradeDocument<PurchaseReturnKind>;
