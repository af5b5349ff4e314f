//! Balance sheet CLI commands
//!
//! Statements print to stdout by default. `--output` writes them to a file
//! and `--save` writes them under the ledger's `balance-sheets` directory.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::config::paths::LedgerPaths;
use crate::config::settings::{Settings, StatementFormat};
use crate::error::LedgerResult;
use crate::export::export_statement;
use crate::reports::BalanceStatement;
use crate::services::{BalanceService, UserService};
use crate::storage::{write_atomic, Storage};

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FormatArg {
    /// Plain text table
    Table,
    /// CSV (spreadsheet-compatible)
    Csv,
    /// JSON
    Json,
    /// YAML
    Yaml,
}

impl From<FormatArg> for StatementFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Table => StatementFormat::Table,
            FormatArg::Csv => StatementFormat::Csv,
            FormatArg::Json => StatementFormat::Json,
            FormatArg::Yaml => StatementFormat::Yaml,
        }
    }
}

/// Output options shared by every balance command
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Output format (defaults to the configured statement format)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Write the statement to this file instead of stdout
    #[arg(short, long, conflicts_with = "save")]
    pub output: Option<PathBuf>,

    /// Save the statement under the ledger's balance-sheets directory
    #[arg(long)]
    pub save: bool,
}

/// Balance subcommands
#[derive(Subcommand)]
pub enum BalanceCommands {
    /// What one user owes across all their expenses
    User {
        /// User id, email or name
        user: String,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Every participant's share of every expense
    Overall {
        #[command(flatten)]
        output: OutputArgs,
    },
}

/// Handle a balance command
pub fn handle_balance_command(
    storage: &Storage,
    settings: &Settings,
    cmd: BalanceCommands,
) -> LedgerResult<()> {
    let service = BalanceService::new(storage);

    match cmd {
        BalanceCommands::User { user, output } => {
            let u = UserService::new(storage).resolve(&user)?;
            let statement = service.user_statement(u.id)?;

            if statement.is_empty() {
                println!("No expenses found for {}.", u.name);
                return Ok(());
            }

            let file_stem = format!("balance-sheet-{}", u.id.as_uuid());
            emit(storage.paths(), settings, &statement, &output, &file_stem)
        }

        BalanceCommands::Overall { output } => {
            let statement = service.overall_statement()?;
            emit(
                storage.paths(),
                settings,
                &statement,
                &output,
                "balance-sheet-overall",
            )
        }
    }
}

/// Render a statement and send it where the output options say
fn emit(
    paths: &LedgerPaths,
    settings: &Settings,
    statement: &BalanceStatement,
    output: &OutputArgs,
    file_stem: &str,
) -> LedgerResult<()> {
    let format = output
        .format
        .map(StatementFormat::from)
        .unwrap_or(settings.default_statement_format);

    let mut rendered = Vec::new();
    export_statement(statement, format, &settings.currency_symbol, &mut rendered)?;

    let target = if output.save {
        Some(
            paths
                .statements_dir()
                .join(format!("{}.{}", file_stem, format.extension())),
        )
    } else {
        output.output.clone()
    };

    match target {
        Some(path) => {
            write_atomic(&path, &rendered)?;
            println!("Balance sheet saved to: {}", path.display());
        }
        None => print!("{}", String::from_utf8_lossy(&rendered)),
    }

    Ok(())
}
