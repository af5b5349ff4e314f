//! Reports module for SplitLedger
//!
//! Balance sheets: per-user statements with a grand total and the overall
//! statement covering every participant.

pub mod balance_sheet;

pub use balance_sheet::{
    build_overall_statement, build_user_statement, BalanceStatement, StatementRow, StatementScope,
};
