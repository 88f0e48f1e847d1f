//! Chart of accounts.
//!
//! The chart is an arena of accounts keyed by id. Parent and child links are
//! id references; only leaf accounts carry a directly mutated balance and every
//! parent total is recomputed from its leaves on demand.

pub mod roles;
pub mod seed;
pub mod tree;
pub mod types;

#[cfg(test)]
mod tree_props;

pub use roles::AccountRoles;
pub use seed::default_chart;
pub use tree::ChartOfAccounts;
pub use types::{Account, AccountPatch, NewAccount};
