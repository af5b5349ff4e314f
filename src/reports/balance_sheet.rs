//! Balance sheet
//!
//! Aggregates owed amounts across expenses into an ordered statement, either
//! for a single user (with a grand total) or for everyone (one row per
//! participant, no total). Building a statement is pure: the caller loads
//! the expenses and the user names and renders the result.
//!
//! A row that cannot be computed aborts the whole statement with
//! [`LedgerError::Statement`], naming the expense number and participant.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, ExpenseId, Money, UserId, UNKNOWN_USER_NAME};
use crate::services::split;

/// Who a statement is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementScope {
    /// One user's share of every expense they take part in
    User { user_id: UserId, user_name: String },
    /// Every participant of every expense
    Overall,
}

/// One line of a balance statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementRow {
    /// Position of the expense in the statement, starting at 1
    pub sequence: usize,
    pub expense_id: ExpenseId,
    pub expense_date: NaiveDate,
    /// Total amount of the expense
    pub expense_amount: Money,
    pub user_id: UserId,
    pub participant_name: String,
    /// What this participant owes on this expense
    pub owed: Money,
}

/// An ordered set of owed amounts with an optional grand total
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceStatement {
    pub scope: StatementScope,
    pub rows: Vec<StatementRow>,
    /// Sum of `owed` over all rows; only per-user statements carry one
    pub total: Option<Money>,
}

impl BalanceStatement {
    /// True when no expense matched
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn title(&self) -> String {
        match &self.scope {
            StatementScope::User { user_name, .. } => format!("Expense Sheet for {}", user_name),
            StatementScope::Overall => "Overall Balance Sheet".to_string(),
        }
    }

    /// Format the statement as a text table
    pub fn format_terminal(&self, currency_symbol: &str) -> String {
        let mut output = String::new();
        let title = self.title();

        output.push_str(&title);
        output.push('\n');
        output.push_str(&"=".repeat(title.chars().count().max(40)));
        output.push('\n');

        if self.is_empty() {
            output.push_str("No expenses found.\n");
            return output;
        }

        match self.scope {
            StatementScope::User { .. } => {
                output.push_str(&format!(
                    "{:<10} {:>16} {:>16}\n",
                    "Expense #", "Total Amount", "Amount Owed"
                ));
                output.push_str(&"-".repeat(44));
                output.push('\n');

                for row in &self.rows {
                    output.push_str(&format!(
                        "{:<10} {:>16} {:>16}\n",
                        row.sequence,
                        row.expense_amount.format_with_symbol(currency_symbol),
                        row.owed.format_with_symbol(currency_symbol)
                    ));
                }
            }
            StatementScope::Overall => {
                let name_width = self
                    .rows
                    .iter()
                    .map(|r| r.participant_name.chars().count())
                    .max()
                    .unwrap_or(4)
                    .max(4);

                output.push_str(&format!(
                    "{:<12} {:<name_width$} {:>18}\n",
                    "Expense #",
                    "User",
                    "Individual Amount",
                    name_width = name_width
                ));
                output.push_str(&"-".repeat(32 + name_width));
                output.push('\n');

                for row in &self.rows {
                    output.push_str(&format!(
                        "{:<12} {:<name_width$} {:>18}\n",
                        format!("Expense {}", row.sequence),
                        row.participant_name,
                        row.owed.format_with_symbol(currency_symbol),
                        name_width = name_width
                    ));
                }
            }
        }

        if let Some(total) = self.total {
            output.push_str(&"-".repeat(44));
            output.push('\n');
            output.push_str(&format!(
                "{:>27} {:>16}\n",
                "Total",
                total.format_with_symbol(currency_symbol)
            ));
        }

        output
    }
}

/// Build one user's statement
///
/// Expenses the user does not take part in are skipped. Rows are numbered
/// from 1 in the order the expenses are given. An empty statement (no rows,
/// no total) means nothing matched.
pub fn build_user_statement(
    user_id: UserId,
    expenses: &[Expense],
    names: &HashMap<UserId, String>,
) -> LedgerResult<BalanceStatement> {
    let user_name = display_name(names, user_id);
    let mut rows = Vec::new();
    let mut total = Money::zero();

    for expense in expenses {
        let Some(participant) = expense.participant(user_id) else {
            continue;
        };

        let sequence = rows.len() + 1;
        let owed = split::owed_amount(expense, participant)
            .map_err(|e| row_error(sequence, &user_name, e))?;

        total = total.checked_add(owed).ok_or_else(|| {
            row_error(
                sequence,
                &user_name,
                LedgerError::InvalidExpense("statement total is out of range".into()),
            )
        })?;
        rows.push(StatementRow {
            sequence,
            expense_id: expense.id(),
            expense_date: expense.date(),
            expense_amount: expense.amount(),
            user_id,
            participant_name: user_name.clone(),
            owed,
        });
    }

    let total = if rows.is_empty() { None } else { Some(total) };

    Ok(BalanceStatement {
        scope: StatementScope::User { user_id, user_name },
        rows,
        total,
    })
}

/// Build the statement covering every participant of every expense
///
/// Expense `n` in the input is "Expense n" in the output. Participants whose
/// name cannot be resolved are shown as "Unknown".
pub fn build_overall_statement(
    expenses: &[Expense],
    names: &HashMap<UserId, String>,
) -> LedgerResult<BalanceStatement> {
    let mut rows = Vec::with_capacity(expenses.iter().map(Expense::participant_count).sum());

    for (index, expense) in expenses.iter().enumerate() {
        let sequence = index + 1;

        if expense.participants().is_empty() {
            return Err(row_error(
                sequence,
                "(none)",
                LedgerError::InvalidExpense(format!("expense {} has no participants", expense.id())),
            ));
        }

        for participant in expense.participants() {
            let participant_name = display_name(names, participant.user_id);
            let owed = split::owed_amount(expense, participant)
                .map_err(|e| row_error(sequence, &participant_name, e))?;

            rows.push(StatementRow {
                sequence,
                expense_id: expense.id(),
                expense_date: expense.date(),
                expense_amount: expense.amount(),
                user_id: participant.user_id,
                participant_name,
                owed,
            });
        }
    }

    Ok(BalanceStatement {
        scope: StatementScope::Overall,
        rows,
        total: None,
    })
}

fn display_name(names: &HashMap<UserId, String>, user_id: UserId) -> String {
    names
        .get(&user_id)
        .filter(|name| !name.trim().is_empty())
        .cloned()
        .unwrap_or_else(|| UNKNOWN_USER_NAME.to_string())
}

fn row_error(expense: usize, participant: &str, source: LedgerError) -> LedgerError {
    LedgerError::Statement {
        expense,
        participant: participant.to_string(),
        source: Box::new(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ParticipantShare, SplitPolicy};
    use rust_decimal::Decimal;

    struct Fixture {
        alice: UserId,
        bob: UserId,
        carol: UserId,
        names: HashMap<UserId, String>,
    }

    fn fixture() -> Fixture {
        let (alice, bob, carol) = (UserId::new(), UserId::new(), UserId::new());
        let names = HashMap::from([
            (alice, "Alice".to_string()),
            (bob, "Bob".to_string()),
            (carol, "Carol".to_string()),
        ]);
        Fixture {
            alice,
            bob,
            carol,
            names,
        }
    }

    fn equal(cents: i64, users: &[UserId]) -> Expense {
        Expense::unchecked(
            Money::from_cents(cents),
            SplitPolicy::Equal,
            users.iter().copied().map(ParticipantShare::equal).collect(),
        )
    }

    #[test]
    fn test_user_statement_single_equal_expense() {
        let f = fixture();
        let expenses = vec![equal(30000, &[f.alice, f.bob, f.carol])];

        let statement = build_user_statement(f.alice, &expenses, &f.names).unwrap();
        assert_eq!(statement.rows.len(), 1);
        assert_eq!(statement.rows[0].sequence, 1);
        assert_eq!(statement.rows[0].expense_amount, Money::from_cents(30000));
        assert_eq!(statement.rows[0].owed, Money::from_cents(10000));
        assert_eq!(statement.total, Some(Money::from_cents(10000)));
        assert_eq!(statement.title(), "Expense Sheet for Alice");
    }

    #[test]
    fn test_user_statement_for_absent_user_is_empty() {
        let f = fixture();
        let expenses = vec![equal(30000, &[f.alice, f.bob])];

        let statement = build_user_statement(f.carol, &expenses, &f.names).unwrap();
        assert!(statement.is_empty());
        assert_eq!(statement.total, None);
    }

    #[test]
    fn test_user_statement_skips_and_totals() {
        let f = fixture();
        let expenses = vec![
            equal(1000, &[f.alice, f.bob, f.carol]),
            equal(5000, &[f.bob, f.carol]),
            Expense::unchecked(
                Money::from_cents(2000),
                SplitPolicy::Exact,
                vec![
                    ParticipantShare::exact(f.alice, Money::from_cents(1250)),
                    ParticipantShare::exact(f.bob, Money::from_cents(750)),
                ],
            ),
            Expense::unchecked(
                Money::from_cents(999),
                SplitPolicy::Percentage,
                vec![
                    ParticipantShare::percentage(f.alice, Decimal::new(25, 0)),
                    ParticipantShare::percentage(f.carol, Decimal::new(75, 0)),
                ],
            ),
        ];

        let statement = build_user_statement(f.alice, &expenses, &f.names).unwrap();
        let sequences: Vec<_> = statement.rows.iter().map(|r| r.sequence).collect();
        assert_eq!(sequences, vec![1, 2, 3]);

        let owed: Vec<_> = statement.rows.iter().map(|r| r.owed.cents()).collect();
        // 10.00 / 3 = 3.33, exact 12.50, 9.99 * 25% = 2.4975 -> 2.50
        assert_eq!(owed, vec![333, 1250, 250]);
        assert_eq!(statement.total, Some(Money::from_cents(1833)));
    }

    #[test]
    fn test_user_statement_fails_closed() {
        let f = fixture();
        let expenses = vec![
            equal(1000, &[f.alice, f.bob]),
            Expense::unchecked(
                Money::from_cents(1000),
                SplitPolicy::Percentage,
                vec![ParticipantShare::equal(f.alice)],
            ),
        ];

        let err = build_user_statement(f.alice, &expenses, &f.names).unwrap_err();
        match err {
            LedgerError::Statement {
                expense,
                participant,
                source,
            } => {
                assert_eq!(expense, 2);
                assert_eq!(participant, "Alice");
                assert!(matches!(*source, LedgerError::InvalidSplitData { .. }));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_user_statement_total_overflow_is_an_error() {
        let f = fixture();
        let huge = |user| {
            Expense::unchecked(
                Money::from_cents(i64::MAX),
                SplitPolicy::Exact,
                vec![ParticipantShare::exact(user, Money::from_cents(i64::MAX))],
            )
        };
        let expenses = vec![huge(f.alice), huge(f.alice)];

        let err = build_user_statement(f.alice, &expenses, &f.names).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Statement { expense: 2, ref source, .. }
                if matches!(**source, LedgerError::InvalidExpense(_))
        ));
    }

    #[test]
    fn test_overall_statement_row_count() {
        let f = fixture();
        let expenses = vec![
            equal(30000, &[f.alice, f.bob, f.carol]),
            equal(1000, &[f.bob]),
            equal(4000, &[f.alice, f.carol]),
        ];

        let statement = build_overall_statement(&expenses, &f.names).unwrap();
        let expected: usize = expenses.iter().map(Expense::participant_count).sum();
        assert_eq!(statement.rows.len(), expected);
        assert_eq!(statement.total, None);

        let second: Vec<_> = statement.rows.iter().filter(|r| r.sequence == 2).collect();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].participant_name, "Bob");
        assert_eq!(second[0].owed, Money::from_cents(1000));
    }

    #[test]
    fn test_overall_statement_unknown_names() {
        let f = fixture();
        let stranger = UserId::new();
        let expenses = vec![equal(1000, &[f.alice, stranger])];

        let statement = build_overall_statement(&expenses, &f.names).unwrap();
        assert_eq!(statement.rows[1].participant_name, "Unknown");
    }

    #[test]
    fn test_overall_statement_rejects_empty_expense() {
        let f = fixture();
        let expenses = vec![equal(1000, &[f.alice]), equal(1000, &[])];

        let err = build_overall_statement(&expenses, &f.names).unwrap_err();
        assert!(matches!(err, LedgerError::Statement { expense: 2, .. }));
    }

    #[test]
    fn test_statements_are_idempotent() {
        let f = fixture();
        let expenses = vec![
            equal(1001, &[f.alice, f.bob, f.carol]),
            equal(250, &[f.alice, f.bob]),
        ];

        let first = build_user_statement(f.bob, &expenses, &f.names).unwrap();
        let second = build_user_statement(f.bob, &expenses, &f.names).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.format_terminal("₹"), second.format_terminal("₹"));

        let first = build_overall_statement(&expenses, &f.names).unwrap();
        let second = build_overall_statement(&expenses, &f.names).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_format_terminal() {
        let f = fixture();
        let expenses = vec![equal(30000, &[f.alice, f.bob, f.carol])];

        let user = build_user_statement(f.alice, &expenses, &f.names).unwrap();
        let text = user.format_terminal("₹");
        assert!(text.starts_with("Expense Sheet for Alice\n"));
        assert!(text.contains("₹300.00"));
        assert!(text.contains("Total"));

        let overall = build_overall_statement(&expenses, &f.names).unwrap();
        let text = overall.format_terminal("$");
        assert!(text.contains("Expense 1"));
        assert!(text.contains("Carol"));
        assert!(!text.contains("Total"));

        let empty = build_user_statement(UserId::new(), &expenses, &f.names).unwrap();
        assert!(empty.format_terminal("$").contains("No expenses found."));
    }
}
