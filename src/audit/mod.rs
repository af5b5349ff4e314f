//! Audit logging for SplitLedger
//!
//! Every user and expense create or delete is appended to `audit.log` as a
//! JSON line, so the ledger's history can be reconstructed after the fact.

mod entry;
mod logger;

pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
