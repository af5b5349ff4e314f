//! YAML export of balance statements

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::export::json::StatementExport;
use crate::reports::balance_sheet::BalanceStatement;

/// Export a statement as YAML, headed by a comment with its title
pub fn export_statement_yaml<W: Write>(
    statement: &BalanceStatement,
    writer: &mut W,
) -> LedgerResult<()> {
    let export = StatementExport::from_statement(statement);

    writeln!(writer, "# {}", export.title).map_err(|e| LedgerError::Export(e.to_string()))?;

    serde_yaml::to_writer(writer, &export).map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(())
}
