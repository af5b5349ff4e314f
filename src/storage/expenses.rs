//! Expense repository for JSON storage
//!
//! Manages loading and saving expenses to expenses.json. Expenses come back
//! in ledger order: by date, then by creation time.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{Expense, ExpenseId, UserId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable expense data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Repository for expense persistence with a participant index
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
    /// Index: user_id -> expense_ids the user takes part in
    by_user: RwLock<HashMap<UserId, Vec<ExpenseId>>>,
}

fn ledger_order(expenses: &mut [Expense]) {
    expenses.sort_by(|a, b| {
        a.date()
            .cmp(&b.date())
            .then(a.created_at().cmp(&b.created_at()))
            .then(a.id().cmp(&b.id()))
    });
}

impl ExpenseRepository {
    /// Create a new expense repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_user: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk and build the participant index
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_user = self
            .by_user
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_user.clear();

        for expense in file_data.expenses {
            let id = expense.id();
            for share in expense.participants() {
                by_user.entry(share.user_id).or_default().push(id);
            }
            data.insert(id, expense);
        }

        Ok(())
    }

    /// Save expenses to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let expenses = self.get_all()?;
        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all expenses in ledger order
    pub fn get_all(&self) -> Result<Vec<Expense>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        ledger_order(&mut expenses);
        Ok(expenses)
    }

    /// Get the expenses a user takes part in, in ledger order
    pub fn get_by_user(&self, user_id: UserId) -> Result<Vec<Expense>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_user = self
            .by_user
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let ids = by_user.get(&user_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut expenses: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        ledger_order(&mut expenses);
        Ok(expenses)
    }

    /// Insert an expense
    ///
    /// Expenses are immutable once recorded, so an existing id is rejected.
    pub fn insert(&self, expense: Expense) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_user = self
            .by_user
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let id = expense.id();
        if data.contains_key(&id) {
            return Err(LedgerError::Duplicate {
                entity_type: "Expense",
                identifier: id.to_string(),
            });
        }

        for share in expense.participants() {
            by_user.entry(share.user_id).or_default().push(id);
        }
        data.insert(id, expense);
        Ok(())
    }

    /// Delete an expense, returning it if it existed
    pub fn delete(&self, id: ExpenseId) -> Result<Option<Expense>, LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_user = self
            .by_user
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let removed = data.remove(&id);
        if let Some(expense) = &removed {
            for share in expense.participants() {
                if let Some(ids) = by_user.get_mut(&share.user_id) {
                    ids.retain(|e| *e != id);
                }
            }
        }
        Ok(removed)
    }

    /// Count expenses
    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}
