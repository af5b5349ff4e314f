//! SplitLedger - shared expense ledger
//!
//! Users record shared expenses, each split among its participants equally,
//! by exact amounts, or by percentage. The ledger answers what each user owes
//! and renders balance sheets.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (users, expenses, money, ids)
//! - `storage`: JSON file storage layer
//! - `audit`: Audit logging system
//! - `services`: Business logic layer, including the split calculator
//! - `reports`: Balance sheet aggregation
//! - `export`: Statement rendering to CSV, JSON and YAML
//! - `cli`: Command handlers for the `splitledger` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use splitledger::config::{paths::LedgerPaths, settings::Settings};
//! use splitledger::services::BalanceService;
//! use splitledger::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//! let statement = BalanceService::new(&storage).overall_statement()?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{LedgerError, LedgerResult};
