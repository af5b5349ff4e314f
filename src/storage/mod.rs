//! Storage layer for SplitLedger
//!
//! JSON file repositories with atomic writes, plus the audit log hooks the
//! services call after every change.

pub mod expenses;
pub mod file_io;
pub mod init;
pub mod users;

pub use expenses::ExpenseRepository;
pub use file_io::{read_json, write_atomic, write_json_atomic};
pub use init::initialize_storage;
pub use users::UserRepository;

use serde::Serialize;
use tracing::debug;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    pub users: UserRepository,
    pub expenses: ExpenseRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create a new Storage instance
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self {
            users: UserRepository::new(paths.users_file()),
            expenses: ExpenseRepository::new(paths.expenses_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    /// Get the paths configuration
    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), LedgerError> {
        self.users.load()?;
        self.expenses.load()?;
        debug!(
            users = self.users.count()?,
            expenses = self.expenses.count()?,
            base_dir = %self.paths.base_dir().display(),
            "ledger loaded"
        );
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), LedgerError> {
        self.users.save()?;
        self.expenses.save()?;
        Ok(())
    }

    /// Record a create in the audit log
    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), LedgerError> {
        debug!(%entity_type, %entity_id, "audit create");
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    /// Record a delete in the audit log
    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), LedgerError> {
        debug!(%entity_type, %entity_id, "audit delete");
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    /// The audit log this storage writes to
    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::models::User;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        assert!(temp_dir.path().join("balance-sheets").exists());
        assert!(!storage.is_initialized());
    }

    #[test]
    fn test_save_and_load_all() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();

        storage
            .users
            .upsert(User::new("Asha", "asha@example.com", "9876543210"))
            .unwrap();
        storage.save_all().unwrap();

        let reloaded = Storage::new(paths).unwrap();
        reloaded.load_all().unwrap();
        assert_eq!(reloaded.users.count().unwrap(), 1);
        assert_eq!(reloaded.expenses.count().unwrap(), 0);
    }

    #[test]
    fn test_audit_hooks() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        let user = User::new("Asha", "asha@example.com", "9876543210");

        storage
            .log_create(
                EntityType::User,
                user.id.to_string(),
                Some(user.name.clone()),
                &user,
            )
            .unwrap();
        storage
            .log_delete(EntityType::User, user.id.to_string(), None, &user)
            .unwrap();

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].operation, Operation::Create);
        assert_eq!(entries[1].operation, Operation::Delete);
    }
}
