//! Business rule validation for journal lines.

use rust_decimal::Decimal;
use thiserror::Error;

use mizan_shared::types::{AccountId, checked_sum};

use super::types::{JournalTotals, LineDraft};

/// Validation errors for journal lines.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerValidationError {
    /// Entry has no lines.
    #[error("Journal entry must have at least one line")]
    NoLines,

    /// A line does not carry exactly one positive side.
    #[error("Line {index} on account {account_id} must have exactly one positive debit or credit")]
    InvalidLine {
        /// Zero-based line index.
        index: usize,
        /// The line's account.
        account_id: AccountId,
    },

    /// Debits and credits differ.
    #[error("Journal entry is unbalanced: debits ({debits}) != credits ({credits})")]
    Unbalanced {
        /// Total debit amount.
        debits: Decimal,
        /// Total credit amount.
        credits: Decimal,
    },

    /// Line totals do not fit in a decimal.
    #[error("Journal entry totals are out of range")]
    OutOfRange,
}

/// Validates that a set of lines can form a journal entry.
///
/// # Errors
///
/// Returns an error if there are no lines, a line is not one-sided and positive,
/// or the lines do not balance.
pub fn validate_lines(lines: &[LineDraft]) -> Result<JournalTotals, LedgerValidationError> {
    if lines.is_empty() {
        return Err(LedgerValidationError::NoLines);
    }

    for (index, line) in lines.iter().enumerate() {
        let one_sided = (line.debit > Decimal::ZERO && line.credit.is_zero())
            || (line.credit > Decimal::ZERO && line.debit.is_zero());
        if !one_sided {
            return Err(LedgerValidationError::InvalidLine {
                index,
                account_id: line.account_id,
            });
        }
    }

    if checked_sum(lines.iter().map(|l| l.debit)).is_err()
        || checked_sum(lines.iter().map(|l| l.credit)).is_err()
    {
        return Err(LedgerValidationError::OutOfRange);
    }
    let totals = JournalTotals::of(lines);
    if !totals.is_balanced() {
        return Err(LedgerValidationError::Unbalanced {
            debits: totals.debit,
            credits: totals.credit,
        });
    }

    Ok(totals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn debit(amount: Decimal) -> LineDraft {
        LineDraft::debit(AccountId::new(1), amount)
    }

    fn credit(amount: Decimal) -> LineDraft {
        LineDraft::credit(AccountId::new(2), amount)
    }

    #[test]
    fn test_balanced_lines() {
        let totals = validate_lines(&[debit(dec!(100)), credit(dec!(60)), credit(dec!(40))]).unwrap();
        assert_eq!(totals.debit, dec!(100));
        assert_eq!(totals.credit, dec!(100));
    }

    #[test]
    fn test_unbalanced_lines() {
        assert!(matches!(
            validate_lines(&[debit(dec!(100)), credit(dec!(50))]),
            Err(LedgerValidationError::Unbalanced { .. })
        ));
    }

    #[test]
    fn test_totals_out_of_range() {
        assert_eq!(
            validate_lines(&[
                debit(Decimal::MAX),
                debit(Decimal::MAX),
                credit(Decimal::MAX),
                credit(Decimal::MAX),
            ]),
            Err(LedgerValidationError::OutOfRange)
        );
    }

    #[test]
    fn test_no_lines() {
        assert_eq!(validate_lines(&[]), Err(LedgerValidationError::NoLines));
    }

    #[rstest]
    #[case(dec!(0), dec!(0))]
    #[case(dec!(10), dec!(10))]
    #[case(dec!(-10), dec!(0))]
    #[case(dec!(0), dec!(-10))]
    #[case(dec!(10), dec!(-5))]
    fn test_line_must_be_one_sided_and_positive(#[case] dr: Decimal, #[case] cr: Decimal) {
        let line = LineDraft {
            account_id: AccountId::new(9),
            debit: dr,
            credit: cr,
        };
        assert_eq!(
            validate_lines(&[line, credit(dec!(10))]),
            Err(LedgerValidationError::InvalidLine {
                index: 0,
                account_id: AccountId::new(9),
            })
        );
    }
}
