//! Customer and supplier registration.

use tracing::info;

use mizan_shared::types::{CustomerId, SupplierId};

use super::{Action, Books, rejected};
use crate::error::LedgerError;
use crate::party::{Customer, NewParty, PartyPatch, Supplier};

macro_rules! party_operations {
    (
        $id:ty, $party:ty, $field:ident, $entity:literal,
        $add:ident, $update:ident, $archive:ident
    ) => {
        impl Books {
            #[doc = concat!("Registers a ", $entity, " with a zero balance.")]
            ///
            /// # Errors
            ///
            /// Returns `MissingField` for a blank name.
            pub fn $add(&mut self, input: NewParty) -> Result<&$party, LedgerError> {
                if input.name.trim().is_empty() {
                    let err = LedgerError::MissingField("name");
                    rejected(stringify!($add), &err);
                    return Err(err);
                }
                let id: $id = self.sequence.next();
                let name = self.$field.add(id, input)?.name.clone();
                info!(party = %id, "{} added", $entity);
                self.record(Action::Created, $entity, id, name);
                self.$field.get(id)
            }

            #[doc = concat!("Edits a ", $entity, "'s contact fields. The balance never changes here.")]
            ///
            /// # Errors
            ///
            /// Returns an error for an unknown or archived party, or a blank name.
            pub fn $update(&mut self, id: $id, patch: PartyPatch) -> Result<&$party, LedgerError> {
                let name = self
                    .$field
                    .update(id, patch)
                    .inspect_err(|e| rejected(stringify!($update), e))?
                    .name
                    .clone();
                info!(party = %id, "{} updated", $entity);
                self.record(Action::Updated, $entity, id, name);
                self.$field.get(id)
            }

            #[doc = concat!("Archives a ", $entity, " whose balance is zero.")]
            ///
            /// # Errors
            ///
            /// Returns a conflict for a non-zero balance or an already archived party.
            pub fn $archive(&mut self, id: $id) -> Result<&$party, LedgerError> {
                self.$field
                    .archive(id)
                    .inspect_err(|e| rejected(stringify!($archive), e))?;
                info!(party = %id, "{} archived", $entity);
                self.record(Action::Archived, $entity, id, "");
                self.$field.get(id)
            }
        }
    };
}

party_operations!(
    CustomerId,
    Customer,
    customers,
    "Customer",
    add_customer,
    update_customer,
    archive_customer
);
party_operations!(
    SupplierId,
    Supplier,
    suppliers,
    "Supplier",
    add_supplier,
    update_supplier,
    archive_supplier
);
