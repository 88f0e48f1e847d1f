//! Financial statements and reports.
//!
//! Pure functions over the chart, journal, and inventory:
//! - Trial Balance
//! - Balance Sheet (with inventory valuation reconciliation)
//! - Profit and Loss
//! - Account and party statements
//! - Inventory valuation and sub-ledger reconciliation

pub mod service;
pub mod types;


pub use service::ReportService;
pub use types::*;
