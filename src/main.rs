use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use splitledger::cli::{
    handle_balance_command, handle_expense_command, handle_user_command, BalanceCommands,
    ExpenseCommands, UserCommands,
};
use splitledger::config::{paths::LedgerPaths, settings::Settings};
use splitledger::storage::{init::initialize_storage, Storage};

/// Environment variable holding the diagnostic log filter
const LOG_ENV: &str = "SPLITLEDGER_LOG";

#[derive(Parser)]
#[command(
    name = "splitledger",
    version,
    about = "Shared expense ledger",
    long_about = "SplitLedger records shared expenses, splits each one equally, \
                  by exact amounts or by percentage, and prints balance sheets \
                  showing what every participant owes."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new ledger
    Init,

    /// Show current configuration and paths
    Config,

    /// User management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Expense management commands
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Balance sheets
    #[command(subcommand)]
    Balance(BalanceCommands),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing SplitLedger at: {}", paths.base_dir().display());
            if initialize_storage(&paths)? {
                println!("Initialization complete!");
            } else {
                println!("Ledger already initialized.");
            }
            println!();
            println!("Run 'splitledger user add <name> --email <email> --mobile <mobile>' to add people.");
        }
        Some(Commands::Config) => {
            println!("SplitLedger Configuration");
            println!("=========================");
            println!("Base directory:     {}", paths.base_dir().display());
            println!("Data directory:     {}", paths.data_dir().display());
            println!("Balance sheets:     {}", paths.statements_dir().display());
            println!("Audit log:          {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:      {}", settings.currency_symbol);
            println!("  Date format:          {}", settings.date_format);
            println!("  Percentage tolerance: {}", settings.percentage_tolerance);
            println!(
                "  Statement format:     {}",
                settings.default_statement_format.as_str()
            );
        }
        Some(Commands::User(cmd)) => {
            handle_user_command(&storage, cmd)?;
        }
        Some(Commands::Expense(cmd)) => {
            handle_expense_command(&storage, &settings, cmd)?;
        }
        Some(Commands::Balance(cmd)) => {
            handle_balance_command(&storage, &settings, cmd)?;
        }
        None => {
            println!("SplitLedger - shared expense ledger");
            println!();
            println!("Run 'splitledger --help' for usage information.");
        }
    }

    Ok(())
}
