//! Business documents and their financial effects.
//!
//! Each document type translates into a balanced set of journal lines plus the
//! stock and party movements that accompany them. The effect is always derived
//! from the stored document, so archiving and unarchiving replay it exactly.

pub mod adjustment;
pub mod effect;
pub mod treasury;
pub mod types;

pub use adjustment::{AdjustmentInput, AdjustmentKind, InventoryAdjustment};
pub use effect::Effect;
pub use treasury::{
    Counterparty, TransferInput, TreasuryInput, TreasuryKind, TreasuryTransaction,
};
pub use types::{
    DocumentKind, LineItem, LineItemInput, Purchase, PurchaseInput, PurchaseKind, PurchaseReturn,
    PurchaseReturnInput, PurchaseReturnKind, Sale, SaleInput, SaleKind, SaleReturn,
    SaleReturnInput, SaleReturnKind, Settlement, TradeDocument, TradeInput, TradeKind, TradeTerms,
};
