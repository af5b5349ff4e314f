//! User repository for JSON storage
//!
//! Manages loading and saving users to users.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{User, UserId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable user data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct UserData {
    users: Vec<User>,
}

/// Repository for user persistence
pub struct UserRepository {
    path: PathBuf,
    data: RwLock<HashMap<UserId, User>>,
    /// Index: normalized email -> user_id
    by_email: RwLock<HashMap<String, UserId>>,
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_email: RwLock::new(HashMap::new()),
        }
    }

    /// Load users from disk
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: UserData = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_email = self
            .by_email
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        data.clear();
        by_email.clear();

        for user in file_data.users {
            by_email.insert(User::normalize_email(&user.email), user.id);
            data.insert(user.id, user);
        }

        Ok(())
    }

    /// Save users to disk
    pub fn save(&self) -> Result<(), LedgerError> {
        let users = self.get_all()?;
        write_json_atomic(&self.path, &UserData { users })
    }

    /// Get a user by ID
    pub fn get(&self, id: UserId) -> Result<Option<User>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.get(&id).cloned())
    }

    /// Get all users, oldest first
    pub fn get_all(&self) -> Result<Vec<User>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let mut users: Vec<_> = data.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(users)
    }

    /// Get a user by email (case-insensitive)
    pub fn get_by_email(&self, email: &str) -> Result<Option<User>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        let by_email = self
            .by_email
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(by_email
            .get(&User::normalize_email(email))
            .and_then(|id| data.get(id).cloned()))
    }

    /// All users whose name matches (case-insensitive)
    pub fn find_by_name(&self, name: &str) -> Result<Vec<User>, LedgerError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|u| u.matches_name(name))
            .collect())
    }

    /// Display names keyed by user id
    pub fn names(&self) -> Result<HashMap<UserId, String>, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        Ok(data.iter().map(|(id, u)| (*id, u.name.clone())).collect())
    }

    /// Insert or update a user
    pub fn upsert(&self, user: User) -> Result<(), LedgerError> {
        let mut data = self
            .data
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let mut by_email = self
            .by_email
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        if let Some(old) = data.get(&user.id) {
            by_email.remove(&User::normalize_email(&old.email));
        }

        by_email.insert(User::normalize_email(&user.email), user.id);
        data.insert(user.id, user);
        Ok(())
    }

    /// Count users
    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self
            .data
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, UserRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("users.json");
        let repo = UserRepository::new(path);
        (temp_dir, repo)
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_upsert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let user = User::new("Asha", "asha@example.com", "9876543210");
        let id = user.id;
        repo.upsert(user).unwrap();

        let fetched = repo.get(id).unwrap().unwrap();
        assert_eq!(fetched.name, "Asha");
    }

    #[test]
    fn test_email_lookup_ignores_case() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(User::new("Asha", "Asha@Example.com", "9876543210"))
            .unwrap();

        assert!(repo.get_by_email("asha@example.COM").unwrap().is_some());
        assert!(repo.get_by_email("bob@example.com").unwrap().is_none());
    }

    #[test]
    fn test_email_index_follows_update() {
        let (_temp_dir, repo) = create_test_repo();
        let mut user = User::new("Asha", "asha@example.com", "9876543210");
        repo.upsert(user.clone()).unwrap();

        user.email = "asha@work.example".into();
        repo.upsert(user).unwrap();

        assert!(repo.get_by_email("asha@example.com").unwrap().is_none());
        assert!(repo.get_by_email("asha@work.example").unwrap().is_some());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();

        let user = User::new("Ravi", "ravi@example.com", "9123456780");
        let id = user.id;
        repo.upsert(user).unwrap();
        repo.save().unwrap();

        let repo2 = UserRepository::new(temp_dir.path().join("users.json"));
        repo2.load().unwrap();

        assert_eq!(repo2.count().unwrap(), 1);
        assert_eq!(repo2.get(id).unwrap().unwrap().email, "ravi@example.com");
        assert!(repo2.get_by_email("ravi@example.com").unwrap().is_some());
    }

    #[test]
    fn test_names_map() {
        let (_temp_dir, repo) = create_test_repo();
        let user = User::new("Ravi", "ravi@example.com", "9123456780");
        let id = user.id;
        repo.upsert(user).unwrap();

        let names = repo.names().unwrap();
        assert_eq!(names.get(&id).map(String::as_str), Some("Ravi"));
    }

    #[test]
    fn test_find_by_name() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(User::new("Asha", "a1@example.com", "9876543210"))
            .unwrap();
        repo.upsert(User::new("asha", "a2@example.com", "9876543211"))
            .unwrap();
        repo.upsert(User::new("Ravi", "r@example.com", "9876543212"))
            .unwrap();

        assert_eq!(repo.find_by_name("ASHA").unwrap().len(), 2);
        assert!(repo.find_by_name("Meera").unwrap().is_empty());
    }
}
