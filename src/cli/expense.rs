//! Expense CLI commands
//!
//! Participants are given as `--with <user>[:<value>]`, where the value is an
//! amount under an exact split, a percentage under a percentage split, and
//! absent under an equal split.

use std::collections::HashMap;

use chrono::NaiveDate;
use clap::Subcommand;
use rust_decimal::Decimal;

use crate::config::settings::Settings;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{ExpenseDraft, Money, ParticipantShare, SplitPolicy, UNKNOWN_USER_NAME};
use crate::services::{split, ExpenseService, UserService};
use crate::storage::Storage;

use super::user::truncate;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record a new shared expense
    Add {
        /// Total amount (e.g. 1200 or 1200.50)
        amount: String,
        /// Split policy: equal, exact or percentage
        #[arg(short, long, default_value = "equal")]
        split: String,
        /// Participant as <user> or <user>:<amount|percent> (repeatable)
        #[arg(short, long = "with", value_name = "USER[:VALUE]", required = true)]
        with: Vec<String>,
        /// Description
        #[arg(short, long)]
        description: Option<String>,
        /// Expense date (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List expenses
    List {
        /// Only expenses this user takes part in
        #[arg(short, long)]
        user: Option<String>,
    },
    /// Show an expense with each participant's share
    Show {
        /// Expense ID
        expense: String,
    },
    /// Delete an expense
    Delete {
        /// Expense ID
        expense: String,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> LedgerResult<()> {
    let service = ExpenseService::new(storage);
    let user_service = UserService::new(storage);

    match cmd {
        ExpenseCommands::Add {
            amount,
            split,
            with,
            description,
            date,
        } => {
            let amount =
                Money::parse(&amount).map_err(|e| LedgerError::Validation(e.to_string()))?;
            let policy: SplitPolicy = split.parse()?;

            let mut participants = Vec::with_capacity(with.len());
            for spec in &with {
                let (user, value) = split_participant_arg(spec);
                let user = user_service.resolve(user)?;
                participants.push(participant_share(policy, user.id, value)?);
            }

            let mut draft = ExpenseDraft::new(amount, policy.as_str(), participants);
            draft.description = description.unwrap_or_default();
            draft.date = date.as_deref().map(parse_date).transpose()?;

            let expense = service.add(draft, settings.percentage_tolerance)?;
            println!("Recorded expense: {}", expense.id());
            println!(
                "  {} split {} ways on {}",
                expense.amount(),
                expense.participant_count(),
                expense.date().format(&settings.date_format)
            );
        }

        ExpenseCommands::List { user } => {
            let expenses = match user {
                Some(u) => service.list_for_user(user_service.resolve(&u)?.id)?,
                None => service.list()?,
            };

            if expenses.is_empty() {
                println!("No expenses found.");
                return Ok(());
            }

            println!(
                "{:14} {:10} {:>12} {:10} {:>6}  {}",
                "ID", "Date", "Amount", "Split", "People", "Description"
            );
            println!("{}", "-".repeat(80));

            for expense in &expenses {
                println!(
                    "{:14} {:10} {:>12} {:10} {:>6}  {}",
                    expense.id().to_string(),
                    expense.date().format(&settings.date_format).to_string(),
                    expense.amount().to_string(),
                    expense.split_type().as_str(),
                    expense.participant_count(),
                    truncate(expense.description(), 30)
                );
            }

            println!("\nTotal: {} expenses", expenses.len());
        }

        ExpenseCommands::Show { expense } => {
            let e = service
                .find(&expense)?
                .ok_or_else(|| LedgerError::expense_not_found(&expense))?;
            let names: HashMap<_, _> = user_service
                .list()?
                .into_iter()
                .map(|u| (u.id, u.name))
                .collect();

            println!("Expense: {}", e.id());
            println!("Date:    {}", e.date().format(&settings.date_format));
            println!("Amount:  {}", e.amount());
            println!("Split:   {}", e.split_type());
            if !e.description().is_empty() {
                println!("Note:    {}", e.description());
            }

            println!("\n{:24} {:>12}", "Participant", "Owes");
            println!("{}", "-".repeat(37));
            for owed in split::owed_amounts(&e)? {
                let name = names
                    .get(&owed.user_id)
                    .map(String::as_str)
                    .unwrap_or(UNKNOWN_USER_NAME);
                println!("{:24} {:>12}", truncate(name, 24), owed.amount.to_string());
            }
        }

        ExpenseCommands::Delete { expense, force } => {
            let e = service
                .find(&expense)?
                .ok_or_else(|| LedgerError::expense_not_found(&expense))?;

            if !force {
                println!("About to delete expense: {}", e);
                println!("Use --force to confirm deletion");
                return Ok(());
            }

            let deleted = service.delete(e.id())?;
            println!("Deleted expense: {}", deleted.id());
        }
    }

    Ok(())
}

/// Split `user:value` into its parts; the value is optional
fn split_participant_arg(spec: &str) -> (&str, Option<&str>) {
    match spec.rsplit_once(':') {
        Some((user, value)) => (user.trim(), Some(value.trim())),
        None => (spec.trim(), None),
    }
}

/// Build a participant share for `policy` from an optional CLI value
///
/// A missing value is passed through as a missing field so the split engine
/// reports it against the participant.
fn participant_share(
    policy: SplitPolicy,
    user_id: crate::models::UserId,
    value: Option<&str>,
) -> LedgerResult<ParticipantShare> {
    match (policy, value) {
        (SplitPolicy::Equal, None) => Ok(ParticipantShare::equal(user_id)),
        (SplitPolicy::Equal, Some(v)) => Err(LedgerError::Validation(format!(
            "equal splits take no per-participant value, got '{}'",
            v
        ))),
        (SplitPolicy::Exact, Some(v)) => {
            let amount = Money::parse(v).map_err(|e| LedgerError::Validation(e.to_string()))?;
            Ok(ParticipantShare::exact(user_id, amount))
        }
        (SplitPolicy::Percentage, Some(v)) => {
            let pct = v
                .trim_end_matches('%')
                .parse::<Decimal>()
                .map_err(|_| LedgerError::Validation(format!("Invalid percentage: '{}'", v)))?;
            Ok(ParticipantShare::percentage(user_id, pct))
        }
        (SplitPolicy::Exact | SplitPolicy::Percentage, None) => {
            Ok(ParticipantShare::equal(user_id))
        }
    }
}

fn parse_date(s: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| LedgerError::Validation(format!("Invalid date '{}', expected YYYY-MM-DD", s)))
}
