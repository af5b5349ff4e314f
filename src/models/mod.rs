//! Core data models for SplitLedger
//!
//! Users, shared expenses and the money and id types they are built from.

pub mod expense;
pub mod ids;
pub mod money;
pub mod user;

pub use expense::{Expense, ExpenseDraft, ParticipantShare, SplitPolicy};
pub use ids::{ExpenseId, UserId};
pub use money::{Money, MoneyParseError};
pub use user::{User, UserValidationError, UNKNOWN_USER_NAME};
