//! Balance service
//!
//! Loads expenses and user names from storage and hands them to the
//! balance sheet builders.

use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::models::UserId;
use crate::reports::balance_sheet::{self, BalanceStatement};
use crate::storage::Storage;

/// Service producing balance statements
pub struct BalanceService<'a> {
    storage: &'a Storage,
}

impl<'a> BalanceService<'a> {
    /// Create a new balance service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Statement of everything `user_id` owes, with a grand total
    ///
    /// An unknown user is an error. A known user with no expenses gets an
    /// empty statement.
    pub fn user_statement(&self, user_id: UserId) -> LedgerResult<BalanceStatement> {
        if self.storage.users.get(user_id)?.is_none() {
            return Err(LedgerError::user_not_found(user_id.to_string()));
        }

        let expenses = self.storage.expenses.get_by_user(user_id)?;
        let names = self.storage.users.names()?;

        let statement = balance_sheet::build_user_statement(user_id, &expenses, &names)?;
        debug!(
            %user_id,
            rows = statement.rows.len(),
            total = ?statement.total.map(|t| t.to_string()),
            "user statement built"
        );
        Ok(statement)
    }

    /// Statement of every participant of every expense
    pub fn overall_statement(&self) -> LedgerResult<BalanceStatement> {
        let expenses = self.storage.expenses.get_all()?;
        let names = self.storage.users.names()?;

        let statement = balance_sheet::build_overall_statement(&expenses, &names)?;
        debug!(
            expenses = expenses.len(),
            rows = statement.rows.len(),
            "overall statement built"
        );
        Ok(statement)
    }
}
