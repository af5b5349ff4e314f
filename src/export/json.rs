//! JSON export of balance statements
//!
//! The exported document is a flat, serializable view of a statement with
//! amounts as fixed two-decimal strings. It carries no timestamp, so the same
//! ledger always exports to the same bytes.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, LedgerResult};
use crate::reports::balance_sheet::{BalanceStatement, StatementScope};

/// Serializable form of a [`BalanceStatement`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementExport {
    pub title: String,

    /// `user` or `overall`
    pub scope: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,

    pub rows: Vec<StatementRowExport>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
}

/// One exported statement row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRowExport {
    pub expense_number: usize,
    pub expense_id: String,
    pub date: String,
    pub expense_amount: String,
    pub user_id: String,
    pub user: String,
    pub amount_owed: String,
}

impl StatementExport {
    pub fn from_statement(statement: &BalanceStatement) -> Self {
        let (scope, user_id, user_name) = match &statement.scope {
            StatementScope::User { user_id, user_name } => (
                "user",
                Some(user_id.as_uuid().to_string()),
                Some(user_name.clone()),
            ),
            StatementScope::Overall => ("overall", None, None),
        };

        let rows = statement
            .rows
            .iter()
            .map(|row| StatementRowExport {
                expense_number: row.sequence,
                expense_id: row.expense_id.as_uuid().to_string(),
                date: row.expense_date.format("%Y-%m-%d").to_string(),
                expense_amount: row.expense_amount.to_string(),
                user_id: row.user_id.as_uuid().to_string(),
                user: row.participant_name.clone(),
                amount_owed: row.owed.to_string(),
            })
            .collect();

        Self {
            title: statement.title(),
            scope: scope.to_string(),
            user_id,
            user_name,
            rows,
            total: statement.total.map(|t| t.to_string()),
        }
    }
}

/// Export a statement as pretty-printed JSON
pub fn export_statement_json<W: Write>(
    statement: &BalanceStatement,
    writer: &mut W,
) -> LedgerResult<()> {
    let export = StatementExport::from_statement(statement);

    serde_json::to_writer_pretty(&mut *writer, &export)
        .map_err(|e| LedgerError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| LedgerError::Export(e.to_string()))?;

    Ok(())
}
