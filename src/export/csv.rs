//! CSV export of balance statements
//!
//! Column headers follow the terminal table. A per-user statement ends with
//! a `Total` row.

use std::io::Write;

use crate::error::{LedgerError, LedgerResult};
use crate::reports::balance_sheet::{BalanceStatement, StatementScope};

fn export_error(e: impl std::fmt::Display) -> LedgerError {
    LedgerError::Export(e.to_string())
}

/// Export a statement as CSV
pub fn export_statement_csv<W: Write>(
    statement: &BalanceStatement,
    writer: &mut W,
) -> LedgerResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    match statement.scope {
        StatementScope::User { .. } => {
            wtr.write_record([
                "Expense #",
                "Expense ID",
                "Date",
                "Total Amount",
                "Amount Owed",
            ])
            .map_err(export_error)?;

            for row in &statement.rows {
                wtr.write_record([
                    row.sequence.to_string(),
                    row.expense_id.to_string(),
                    row.expense_date.format("%Y-%m-%d").to_string(),
                    row.expense_amount.to_string(),
                    row.owed.to_string(),
                ])
                .map_err(export_error)?;
            }

            if let Some(total) = statement.total {
                let total = total.to_string();
                wtr.write_record(["Total", "", "", "", total.as_str()])
                    .map_err(export_error)?;
            }
        }
        StatementScope::Overall => {
            wtr.write_record([
                "Expense #",
                "Expense ID",
                "Date",
                "User",
                "Individual Amount",
            ])
            .map_err(export_error)?;

            for row in &statement.rows {
                wtr.write_record([
                    format!("Expense {}", row.sequence),
                    row.expense_id.to_string(),
                    row.expense_date.format("%Y-%m-%d").to_string(),
                    row.participant_name.clone(),
                    row.owed.to_string(),
                ])
                .map_err(export_error)?;
            }
        }
    }

    wtr.flush().map_err(export_error)?;
    Ok(())
}
