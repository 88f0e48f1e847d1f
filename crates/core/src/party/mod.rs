//! Customer and supplier sub-ledgers.
//!
//! Customer balances are positive when the customer owes us; supplier balances
//! are positive when we owe the supplier. Only the transaction managers move them.

pub mod ledger;
pub mod types;

pub use ledger::PartyLedger;
pub use types::{Customer, NewParty, Party, PartyDelta, PartyPatch, Supplier};
