//! Common types used across the application.

pub mod id;
pub mod money;

pub use id::*;
pub use money::{
    BALANCE_TOLERANCE, MoneyError, STATEMENT_TOLERANCE, checked_product, checked_sum,
    parse_amount, parse_quantity, parse_signed, within_tolerance,
};
