//! Expense service
//!
//! Records validated expenses, lists them and deletes them. An expense is
//! never edited after it is recorded.

use rust_decimal::Decimal;
use tracing::info;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, ExpenseDraft, ExpenseId, UserId};
use crate::storage::Storage;

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    /// Create a new expense service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Validate a draft and record it
    ///
    /// Every participant must be a registered user. Policy errors are
    /// reported before unknown participants.
    pub fn add(&self, draft: ExpenseDraft, percentage_tolerance: Decimal) -> LedgerResult<Expense> {
        let expense = draft.validate(percentage_tolerance)?;

        for share in expense.participants() {
            if self.storage.users.get(share.user_id)?.is_none() {
                return Err(LedgerError::user_not_found(share.user_id.to_string()));
            }
        }

        self.storage.expenses.insert(expense.clone())?;
        self.storage.expenses.save()?;

        let label = if expense.description().is_empty() {
            None
        } else {
            Some(expense.description().to_string())
        };
        self.storage
            .log_create(EntityType::Expense, expense.id().to_string(), label, &expense)?;

        info!(
            expense_id = %expense.id(),
            amount = %expense.amount(),
            split = %expense.split_type(),
            participants = expense.participant_count(),
            "expense recorded"
        );
        Ok(expense)
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> LedgerResult<Option<Expense>> {
        self.storage.expenses.get(id)
    }

    /// Find an expense by full or short id
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Expense>> {
        let identifier = identifier.trim();

        if let Ok(id) = ExpenseId::parse(identifier) {
            return self.storage.expenses.get(id);
        }

        Ok(self
            .storage
            .expenses
            .get_all()?
            .into_iter()
            .find(|e| e.id().matches(identifier)))
    }

    /// All expenses in ledger order
    pub fn list(&self) -> LedgerResult<Vec<Expense>> {
        self.storage.expenses.get_all()
    }

    /// Expenses a user takes part in, in ledger order
    pub fn list_for_user(&self, user_id: UserId) -> LedgerResult<Vec<Expense>> {
        self.storage.expenses.get_by_user(user_id)
    }

    /// Delete an expense
    pub fn delete(&self, id: ExpenseId) -> LedgerResult<Expense> {
        let expense = self
            .storage
            .expenses
            .delete(id)?
            .ok_or_else(|| LedgerError::expense_not_found(id.to_string()))?;
        self.storage.expenses.save()?;

        self.storage
            .log_delete(EntityType::Expense, id.to_string(), None, &expense)?;

        info!(expense_id = %id, "expense deleted");
        Ok(expense)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::LedgerPaths;
    use crate::models::{Money, ParticipantShare, User};
    use crate::services::split::DEFAULT_PERCENTAGE_TOLERANCE;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn add_user(storage: &Storage, name: &str, email: &str) -> UserId {
        let user = User::new(name, email, "9876543210");
        let id = user.id;
        storage.users.upsert(user).unwrap();
        id
    }

    #[test]
    fn test_add_and_list() {
        let (_temp_dir, storage) = create_test_storage();
        let alice = add_user(&storage, "Alice", "alice@example.com");
        let bob = add_user(&storage, "Bob", "bob@example.com");
        let service = ExpenseService::new(&storage);

        let expense = service
            .add(
                ExpenseDraft::new(
                    Money::from_cents(3000),
                    "exact",
                    vec![
                        ParticipantShare::exact(alice, Money::from_cents(1000)),
                        ParticipantShare::exact(bob, Money::from_cents(2000)),
                    ],
                ),
                DEFAULT_PERCENTAGE_TOLERANCE,
            )
            .unwrap();

        assert_eq!(service.list().unwrap(), vec![expense.clone()]);
        assert_eq!(service.list_for_user(bob).unwrap().len(), 1);
        assert!(service.list_for_user(UserId::new()).unwrap().is_empty());
        assert_eq!(
            service.find(&expense.id().to_string()).unwrap(),
            Some(expense)
        );
    }

    #[test]
    fn test_unknown_participant_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let alice = add_user(&storage, "Alice", "alice@example.com");
        let service = ExpenseService::new(&storage);

        let err = service
            .add(
                ExpenseDraft::new(
                    Money::from_cents(1000),
                    "equal",
                    vec![ParticipantShare::equal(alice), ParticipantShare::equal(UserId::new())],
                ),
                DEFAULT_PERCENTAGE_TOLERANCE,
            )
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(service.list().unwrap().len(), 0);
    }

    #[test]
    fn test_unknown_policy_reported_before_unknown_participant() {
        let (_temp_dir, storage) = create_test_storage();
        let service = ExpenseService::new(&storage);

        let err = service
            .add(
                ExpenseDraft::new(
                    Money::from_cents(1000),
                    "custom",
                    vec![ParticipantShare::equal(UserId::new())],
                ),
                DEFAULT_PERCENTAGE_TOLERANCE,
            )
            .unwrap_err();

        assert!(matches!(err, LedgerError::InvalidPolicy(p) if p == "custom"));
    }

    #[test]
    fn test_invalid_draft_not_stored() {
        let (_temp_dir, storage) = create_test_storage();
        let alice = add_user(&storage, "Alice", "alice@example.com");
        let bob = add_user(&storage, "Bob", "bob@example.com");
        let service = ExpenseService::new(&storage);

        let err = service
            .add(
                ExpenseDraft::new(
                    Money::from_cents(1000),
                    "percentage",
                    vec![
                        ParticipantShare::percentage(alice, Decimal::from(30)),
                        ParticipantShare::percentage(bob, Decimal::from(30)),
                    ],
                ),
                DEFAULT_PERCENTAGE_TOLERANCE,
            )
            .unwrap_err();

        assert!(matches!(err, LedgerError::InvalidExpense(_)));
        assert_eq!(service.list().unwrap().len(), 0);
        assert!(storage.audit().read_all().unwrap().is_empty());
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, storage) = create_test_storage();
        let alice = add_user(&storage, "Alice", "alice@example.com");
        let service = ExpenseService::new(&storage);

        let expense = service
            .add(
                ExpenseDraft::new(
                    Money::from_cents(500),
                    "equal",
                    vec![ParticipantShare::equal(alice)],
                ),
                DEFAULT_PERCENTAGE_TOLERANCE,
            )
            .unwrap();

        service.delete(expense.id()).unwrap();
        assert!(service.get(expense.id()).unwrap().is_none());
        assert!(service.delete(expense.id()).unwrap_err().is_not_found());

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].operation, Operation::Delete);
    }
}
