//! Service layer for SplitLedger
//!
//! The service layer provides business logic on top of the storage layer:
//! validation, cross-entity checks and audit logging. The split calculator
//! lives here too but touches neither storage nor logs.

pub mod balance;
pub mod expense;
pub mod split;
pub mod user;

pub use balance::BalanceService;
pub use expense::ExpenseService;
pub use user::UserService;
