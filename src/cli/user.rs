//! User CLI commands

use clap::Subcommand;

use crate::error::LedgerResult;
use crate::services::{ExpenseService, UserService};
use crate::storage::Storage;

/// User subcommands
#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    Add {
        /// Display name
        name: String,
        /// Email address (must be unique)
        #[arg(short, long)]
        email: String,
        /// Ten-digit mobile number
        #[arg(short, long)]
        mobile: String,
    },
    /// Show user details
    Show {
        /// User id, email or name
        user: String,
    },
    /// List all users
    List,
}

/// Handle a user command
pub fn handle_user_command(storage: &Storage, cmd: UserCommands) -> LedgerResult<()> {
    let service = UserService::new(storage);

    match cmd {
        UserCommands::Add {
            name,
            email,
            mobile,
        } => {
            let user = service.create(&name, &email, &mobile)?;
            println!("Created user: {}", user.name);
            println!("  ID: {}", user.id);
        }

        UserCommands::Show { user } => {
            let u = service.resolve(&user)?;
            let expense_count = ExpenseService::new(storage).list_for_user(u.id)?.len();

            println!("User:     {}", u.name);
            println!("ID:       {} ({})", u.id, u.id.as_uuid());
            println!("Email:    {}", u.email);
            println!("Mobile:   {}", u.mobile);
            println!("Expenses: {}", expense_count);
            println!("Created:  {}", u.created_at.format("%Y-%m-%d %H:%M"));
        }

        UserCommands::List => {
            let users = service.list()?;

            if users.is_empty() {
                println!("No users found.");
                return Ok(());
            }

            println!("{:14} {:24} {:30} {:10}", "ID", "Name", "Email", "Mobile");
            println!("{}", "-".repeat(81));

            for user in &users {
                println!(
                    "{:14} {:24} {:30} {:10}",
                    user.id.to_string(),
                    truncate(&user.name, 24),
                    truncate(&user.email, 30),
                    user.mobile
                );
            }

            println!("\nTotal: {} users", users.len());
        }
    }

    Ok(())
}

/// Truncate a string to at most `max_len` characters
pub(crate) fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
