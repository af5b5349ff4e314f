//! Export module for SplitLedger
//!
//! Renders balance statements in the formats the `balance` commands offer:
//! - Table: the terminal layout
//! - CSV: spreadsheet-compatible
//! - JSON / YAML: machine-readable, via [`StatementExport`]

pub mod csv;
pub mod json;
pub mod yaml;

use std::io::Write;

pub use self::csv::export_statement_csv;
pub use json::{export_statement_json, StatementExport, StatementRowExport};
pub use yaml::export_statement_yaml;

use crate::config::settings::StatementFormat;
use crate::error::{LedgerError, LedgerResult};
use crate::reports::balance_sheet::BalanceStatement;

/// Render `statement` in `format`
///
/// `currency_symbol` is only used by the table layout.
pub fn export_statement<W: Write>(
    statement: &BalanceStatement,
    format: StatementFormat,
    currency_symbol: &str,
    writer: &mut W,
) -> LedgerResult<()> {
    match format {
        StatementFormat::Table => writer
            .write_all(statement.format_terminal(currency_symbol).as_bytes())
            .map_err(|e| LedgerError::Export(e.to_string())),
        StatementFormat::Csv => export_statement_csv(statement, writer),
        StatementFormat::Json => export_statement_json(statement, writer),
        StatementFormat::Yaml => export_statement_yaml(statement, writer),
    }
}
