//! User service
//!
//! Registration with contact validation, and lookup by id, email or name.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{User, UserId};
use crate::storage::Storage;

/// Service for user management
pub struct UserService<'a> {
    storage: &'a Storage,
}

impl<'a> UserService<'a> {
    /// Create a new user service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Register a new user
    ///
    /// Name must be non-empty, email must look like `a@b.c` and be unused,
    /// mobile must be exactly ten digits.
    pub fn create(&self, name: &str, email: &str, mobile: &str) -> LedgerResult<User> {
        let user = User::new(name, email, mobile);

        user.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        if self.storage.users.get_by_email(&user.email)?.is_some() {
            return Err(LedgerError::Duplicate {
                entity_type: "User",
                identifier: user.email.clone(),
            });
        }

        self.storage.users.upsert(user.clone())?;
        self.storage.users.save()?;

        self.storage.log_create(
            EntityType::User,
            user.id.to_string(),
            Some(user.name.clone()),
            &user,
        )?;

        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    /// Get a user by ID
    pub fn get(&self, id: UserId) -> LedgerResult<Option<User>> {
        self.storage.users.get(id)
    }

    /// Find a user by full id, short id, email or name
    ///
    /// A name shared by several users is rejected rather than guessed.
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<User>> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Ok(None);
        }

        if let Ok(id) = UserId::parse(identifier) {
            return self.storage.users.get(id);
        }

        let users = self.storage.users.get_all()?;
        if let Some(user) = users.iter().find(|u| u.id.matches(identifier)) {
            return Ok(Some(user.clone()));
        }

        if let Some(user) = self.storage.users.get_by_email(identifier)? {
            return Ok(Some(user));
        }

        let mut by_name = self.storage.users.find_by_name(identifier)?;
        match by_name.len() {
            0 => Ok(None),
            1 => Ok(by_name.pop()),
            n => Err(LedgerError::Validation(format!(
                "{} users are named '{}'; use an id or email instead",
                n, identifier
            ))),
        }
    }

    /// Like [`find`](Self::find) but a miss is an error
    pub fn resolve(&self, identifier: &str) -> LedgerResult<User> {
        self.find(identifier)?
            .ok_or_else(|| LedgerError::user_not_found(identifier))
    }

    /// Get all users
    pub fn list(&self) -> LedgerResult<Vec<User>> {
        self.storage.users.get_all()
    }
}
