//! Storage initialization
//!
//! Handles first-run setup: directories, empty ledger files and default
//! settings.

use crate::config::paths::LedgerPaths;
use crate::config::settings::Settings;
use crate::error::LedgerError;

use super::file_io::write_json_atomic;

/// Initialize storage for a fresh ledger
///
/// Existing files are left untouched. Returns `true` if anything was created.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<bool, LedgerError> {
    paths.ensure_directories()?;

    let mut created = false;

    if !paths.users_file().exists() {
        write_json_atomic(paths.users_file(), &serde_json::json!({ "users": [] }))?;
        created = true;
    }

    if !paths.expenses_file().exists() {
        write_json_atomic(paths.expenses_file(), &serde_json::json!({ "expenses": [] }))?;
        created = true;
    }

    if !paths.settings_file().exists() {
        Settings::default().save(paths)?;
        created = true;
    }

    Ok(created)
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.is_initialized() || !paths.users_file().exists() || !paths.expenses_file().exists()
}
