//! Shared types, errors, and configuration for Mizan.
//!
//! This crate provides common types used across all other crates:
//! - Typed sequential IDs for type-safe entity references
//! - Decimal helpers and boundary parsing for amounts and quantities
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, ChartLayout, LedgerSettings, LoggingConfig, PostingAccounts};
pub use error::{AppError, AppResult};
