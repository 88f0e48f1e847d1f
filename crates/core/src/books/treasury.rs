//! Treasury vouchers and transfers between treasuries.

use rust_decimal::Decimal;
use tracing::info;

use mizan_shared::types::{JournalEntryId, TreasuryId};

use super::{Action, Books, rejected};
use crate::error::LedgerError;
use crate::journal::{EntryHeader, Journal, JournalSource};
use crate::trade::{
    Counterparty, Effect, TransferInput, TreasuryInput, TreasuryKind, TreasuryTransaction,
};

const ENTITY: &str = "Treasury voucher";

impl Books {
    /// Records money received into or paid out of a treasury account.
    ///
    /// A customer or supplier counterparty is posted through the receivable or
    /// payable account and moves that party's balance.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive amount, an account outside the
    /// treasury group, an archived or unknown counterparty, or a counterparty
    /// account equal to the treasury itself.
    pub fn add_treasury_transaction(
        &mut self,
        input: TreasuryInput,
    ) -> Result<&TreasuryTransaction, LedgerError> {
        let id = self
            .try_add_voucher(input)
            .inspect_err(|e| rejected("add_treasury_transaction", e))?;
        self.voucher(id)
    }

    /// Moves funds between two treasuries.
    ///
    /// One journal entry (Dr destination, Cr source) is shared by two linked
    /// vouchers: a payment out of `from` and a receipt into `to`. Returns the
    /// ids of the payment and receipt, in that order.
    ///
    /// # Errors
    ///
    /// Returns an error for a non-positive amount, a non-treasury account on
    /// either side, or the same treasury on both sides.
    pub fn transfer_treasury_funds(
        &mut self,
        input: TransferInput,
    ) -> Result<(TreasuryId, TreasuryId), LedgerError> {
        self.try_transfer(input)
            .inspect_err(|e| rejected("transfer_treasury_funds", e))
    }

    /// Archives a voucher and reverses its journal entry. Archiving either leg
    /// of a transfer archives both.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown or already archived voucher.
    pub fn archive_treasury_transaction(
        &mut self,
        id: TreasuryId,
    ) -> Result<&TreasuryTransaction, LedgerError> {
        self.try_archive_voucher(id)
            .inspect_err(|e| rejected("archive_treasury_transaction", e))?;
        self.voucher(id)
    }

    fn voucher(&self, id: TreasuryId) -> Result<&TreasuryTransaction, LedgerError> {
        self.treasury
            .get(&id)
            .ok_or_else(|| LedgerError::not_found(ENTITY, id))
    }

    fn check_counterparty(&self, input: &TreasuryInput) -> Result<(), LedgerError> {
        match input.counterparty {
            Counterparty::Customer(id) => self.customers.require_active(id).map(|_| ()),
            Counterparty::Supplier(id) => self.suppliers.require_active(id).map(|_| ()),
            Counterparty::Account(account) if account == input.treasury => {
                Err(LedgerError::SameTreasury)
            }
            Counterparty::Account(account) => self.chart.require_postable(account).map(|_| ()),
        }
    }

    fn try_add_voucher(&mut self, input: TreasuryInput) -> Result<TreasuryId, LedgerError> {
        if input.amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount);
        }
        self.require_treasury(input.treasury)?;
        self.check_counterparty(&input)?;
        let effect = Effect::treasury(
            input.kind,
            input.treasury,
            input.counterparty,
            input.amount,
            &self.roles,
        );
        let prepared = Journal::prepare(&self.chart, &effect.lines)?;

        let id: TreasuryId = self.sequence.next();
        let entry_id: JournalEntryId = self.sequence.next();
        let description = if input.description.is_empty() {
            format!("{ENTITY} {id}")
        } else {
            input.description.clone()
        };
        let header = EntryHeader {
            date: input.date,
            description,
            source: JournalSource::Treasury(id),
        };
        self.journal.commit(&mut self.chart, entry_id, header, prepared)?;
        if let Some(delta) = effect.party {
            self.apply_party(delta)?;
        }

        info!(voucher = %id, entry = %entry_id, kind = ?input.kind, amount = %input.amount, "Treasury voucher created");
        self.record(
            Action::Created,
            ENTITY,
            id,
            format!("{:?} {}", input.kind, input.amount),
        );
        self.treasury.insert(
            id,
            TreasuryTransaction {
                id,
                journal_entry_id: entry_id,
                date: input.date,
                kind: input.kind,
                treasury: input.treasury,
                counterparty: input.counterparty,
                amount: input.amount,
                description: input.description,
                linked: None,
                is_archived: false,
            },
        );
        Ok(id)
    }

    fn try_transfer(&mut self, input: TransferInput) -> Result<(TreasuryId, TreasuryId), LedgerError> {
        if input.amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount);
        }
        if input.from == input.to {
            return Err(LedgerError::SameTreasury);
        }
        self.require_treasury(input.from)?;
        self.require_treasury(input.to)?;
        let effect = Effect::treasury(
            TreasuryKind::Payment,
            input.from,
            Counterparty::Account(input.to),
            input.amount,
            &self.roles,
        );
        let prepared = Journal::prepare(&self.chart, &effect.lines)?;

        let payment_id: TreasuryId = self.sequence.next();
        let receipt_id: TreasuryId = self.sequence.next();
        let entry_id: JournalEntryId = self.sequence.next();
        let description = if input.note.is_empty() {
            format!("Transfer {} to {}", input.from, input.to)
        } else {
            input.note.clone()
        };
        let header = EntryHeader {
            date: input.date,
            description: description.clone(),
            source: JournalSource::Treasury(payment_id),
        };
        self.journal.commit(&mut self.chart, entry_id, header, prepared)?;

        let legs = [
            (payment_id, TreasuryKind::Payment, input.from, input.to, receipt_id),
            (receipt_id, TreasuryKind::Receipt, input.to, input.from, payment_id),
        ];
        for (id, kind, treasury, other, linked) in legs {
            self.treasury.insert(
                id,
                TreasuryTransaction {
                    id,
                    journal_entry_id: entry_id,
                    date: input.date,
                    kind,
                    treasury,
                    counterparty: Counterparty::Account(other),
                    amount: input.amount,
                    description: description.clone(),
                    linked: Some(linked),
                    is_archived: false,
                },
            );
        }

        info!(
            from = %input.from,
            to = %input.to,
            entry = %entry_id,
            amount = %input.amount,
            "Treasury transfer created"
        );
        self.record(
            Action::Created,
            ENTITY,
            payment_id,
            format!("transfer {} to {} linked {receipt_id}", input.from, input.to),
        );
        Ok((payment_id, receipt_id))
    }

    fn try_archive_voucher(&mut self, id: TreasuryId) -> Result<(), LedgerError> {
        let voucher = self.voucher(id)?;
        if voucher.is_archived {
            return Err(LedgerError::already_archived(ENTITY, id));
        }
        let entry_id = voucher.journal_entry_id;
        let linked = voucher.linked;
        let party = Effect::treasury(
            voucher.kind,
            voucher.treasury,
            voucher.counterparty,
            voucher.amount,
            &self.roles,
        )
        .party;
        self.journal.check_reversal(&self.chart, entry_id)?;

        self.journal.reverse(&mut self.chart, entry_id)?;
        if let Some(delta) = party {
            self.apply_party(delta.negated())?;
        }
        for leg in std::iter::once(id).chain(linked) {
            if let Some(voucher) = self.treasury.get_mut(&leg) {
                voucher.is_archived = true;
            }
        }
        info!(voucher = %id, entry = %entry_id, "Treasury voucher archived");
        let detail = linked.map(|l| format!("linked {l}")).unwrap_or_default();
        self.record(Action::Archived, ENTITY, id, detail);
        Ok(())
    }
}
