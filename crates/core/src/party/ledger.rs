//! Party registry with running balances.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use mizan_shared::types::MoneyError;

use super::types::{NewParty, Party, PartyPatch};
use crate::error::LedgerError;
use crate::sequence::Sequenced;

/// Registry of one kind of party.
#[derive(Debug, Clone)]
pub struct PartyLedger<Id: Sequenced> {
    entity: &'static str,
    parties: BTreeMap<Id, Party<Id>>,
}

impl<Id: Sequenced> PartyLedger<Id> {
    /// Creates an empty ledger; `entity` names the party kind in errors.
    #[must_use]
    pub fn new(entity: &'static str) -> Self {
        Self {
            entity,
            parties: BTreeMap::new(),
        }
    }

    /// Adds a party with a zero balance.
    pub fn add(&mut self, id: Id, input: NewParty) -> Result<&Party<Id>, LedgerError> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(LedgerError::MissingField("name"));
        }
        self.parties.insert(
            id,
            Party {
                id,
                name: name.to_string(),
                phone: input.phone,
                email: input.email,
                address: input.address,
                balance: Decimal::ZERO,
                is_archived: false,
            },
        );
        self.get(id)
    }

    /// Updates contact fields of an active party.
    pub fn update(&mut self, id: Id, patch: PartyPatch) -> Result<&Party<Id>, LedgerError> {
        self.require_active(id)?;
        let name = match patch.name.as_deref().map(str::trim) {
            Some("") => return Err(LedgerError::MissingField("name")),
            other => other.map(str::to_string),
        };

        let party = self.get_mut(id)?;
        if let Some(name) = name {
            party.name = name;
        }
        if patch.phone.is_some() {
            party.phone = patch.phone;
        }
        if patch.email.is_some() {
            party.email = patch.email;
        }
        if patch.address.is_some() {
            party.address = patch.address;
        }
        Ok(&*party)
    }

    /// Archives a party whose balance is zero.
    pub fn archive(&mut self, id: Id) -> Result<&Party<Id>, LedgerError> {
        let entity = self.entity;
        let party = self.get(id)?;
        if party.is_archived {
            return Err(LedgerError::already_archived(entity, id));
        }
        if !party.balance.is_zero() {
            return Err(LedgerError::PartyHasBalance {
                entity,
                id: id.to_string(),
                balance: party.balance,
            });
        }
        let party = self.get_mut(id)?;
        party.is_archived = true;
        Ok(&*party)
    }

    /// Looks up a party.
    pub fn get(&self, id: Id) -> Result<&Party<Id>, LedgerError> {
        self.parties
            .get(&id)
            .ok_or_else(|| LedgerError::not_found(self.entity, id))
    }

    /// Looks up a party that can appear on new documents.
    pub fn require_active(&self, id: Id) -> Result<&Party<Id>, LedgerError> {
        let party = self.get(id)?;
        if party.is_archived {
            return Err(LedgerError::entity_archived(self.entity, id));
        }
        Ok(party)
    }

    /// Moves a balance. Callers validate the party first.
    pub fn apply(&mut self, id: Id, delta: Decimal) -> Result<(), LedgerError> {
        let party = self.get_mut(id)?;
        party.balance = party
            .balance
            .checked_add(delta)
            .ok_or(MoneyError::OutOfRange)?;
        Ok(())
    }

    /// Overwrites a starting balance.
    pub fn set_opening(&mut self, id: Id, balance: Decimal) -> Result<(), LedgerError> {
        self.get_mut(id)?.balance = balance;
        Ok(())
    }

    /// Sum of every party balance.
    #[must_use]
    pub fn total_balance(&self) -> Decimal {
        self.parties.values().map(|p| p.balance).sum()
    }

    /// All parties in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Party<Id>> {
        self.parties.values()
    }

    fn get_mut(&mut self, id: Id) -> Result<&mut Party<Id>, LedgerError> {
        let entity = self.entity;
        self.parties
            .get_mut(&id)
            .ok_or_else(|| LedgerError::not_found(entity, id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mizan_shared::types::CustomerId;
    use rust_decimal_macros::dec;

    fn ledger() -> (PartyLedger<CustomerId>, CustomerId) {
        let mut ledger = PartyLedger::new("Customer");
        let id = CustomerId::new(1);
        ledger
            .add(
                id,
                NewParty {
                    name: " Acme ".to_string(),
                    ..NewParty::default()
                },
            )
            .unwrap();
        (ledger, id)
    }

    #[test]
    fn test_add_trims_name_and_starts_at_zero() {
        let (ledger, id) = ledger();
        let party = ledger.get(id).unwrap();
        assert_eq!(party.name, "Acme");
        assert_eq!(party.balance, Decimal::ZERO);
    }

    #[test]
    fn test_add_requires_name() {
        let mut ledger: PartyLedger<CustomerId> = PartyLedger::new("Customer");
        assert!(matches!(
            ledger.add(CustomerId::new(1), NewParty::default()),
            Err(LedgerError::MissingField("name"))
        ));
    }

    #[test]
    fn test_update_keeps_balance() {
        let (mut ledger, id) = ledger();
        ledger.apply(id, dec!(40)).unwrap();
        let party = ledger
            .update(
                id,
                PartyPatch {
                    phone: Some("555-0100".to_string()),
                    ..PartyPatch::default()
                },
            )
            .unwrap();
        assert_eq!(party.phone.as_deref(), Some("555-0100"));
        assert_eq!(party.balance, dec!(40));
    }

    #[test]
    fn test_archive_requires_zero_balance() {
        let (mut ledger, id) = ledger();
        ledger.apply(id, dec!(15)).unwrap();
        assert!(matches!(
            ledger.archive(id),
            Err(LedgerError::PartyHasBalance { .. })
        ));

        ledger.apply(id, dec!(-15)).unwrap();
        ledger.archive(id).unwrap();
        assert!(matches!(
            ledger.require_active(id),
            Err(LedgerError::EntityArchived { .. })
        ));
        assert!(matches!(
            ledger.archive(id),
            Err(LedgerError::AlreadyArchived { .. })
        ));
    }

    #[test]
    fn test_unknown_party() {
        let (ledger, _) = ledger();
        let err = ledger.get(CustomerId::new(9)).unwrap_err();
        assert_eq!(err.to_string(), "Customer not found: CUS-000009");
    }
}
