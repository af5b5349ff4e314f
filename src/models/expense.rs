//! Expense model
//!
//! A shared expense is a total amount, a split policy, and the ordered list
//! of participants who share it. Expenses built from user input go through
//! [`ExpenseDraft::validate`]; there is no other public constructor, so an
//! [`Expense`] in hand has already passed every policy check.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use super::ids::{ExpenseId, UserId};
use super::money::Money;
use crate::error::{LedgerError, LedgerResult};
use crate::services::split;

/// How an expense amount is divided among its participants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitPolicy {
    /// Every participant owes `amount / N`
    Equal,
    /// Every participant owes a stated amount
    Exact,
    /// Every participant owes a stated percentage of the amount
    Percentage,
}

impl SplitPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::Exact => "exact",
            Self::Percentage => "percentage",
        }
    }
}

impl fmt::Display for SplitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SplitPolicy {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "equal" => Ok(Self::Equal),
            "exact" => Ok(Self::Exact),
            "percentage" | "percent" => Ok(Self::Percentage),
            _ => Err(LedgerError::InvalidPolicy(s.trim().to_string())),
        }
    }
}

/// One user's share of an expense
///
/// `amount_owed` is only read under [`SplitPolicy::Exact`] and `percentage`
/// only under [`SplitPolicy::Percentage`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipantShare {
    pub user_id: UserId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_owed: Option<Money>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentage: Option<Decimal>,
}

impl ParticipantShare {
    /// A share under an equal split
    pub fn equal(user_id: UserId) -> Self {
        Self {
            user_id,
            amount_owed: None,
            percentage: None,
        }
    }

    /// A share with a stated amount
    pub fn exact(user_id: UserId, amount_owed: Money) -> Self {
        Self {
            user_id,
            amount_owed: Some(amount_owed),
            percentage: None,
        }
    }

    /// A share with a stated percentage (0-100)
    pub fn percentage(user_id: UserId, percentage: Decimal) -> Self {
        Self {
            user_id,
            amount_owed: None,
            percentage: Some(percentage),
        }
    }
}

/// A recorded shared expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    id: ExpenseId,
    amount: Money,
    split_type: SplitPolicy,
    participants: Vec<ParticipantShare>,
    #[serde(default)]
    description: String,
    date: NaiveDate,
    created_at: DateTime<Utc>,
}

impl Expense {
    pub fn id(&self) -> ExpenseId {
        self.id
    }

    /// Total amount of the expense
    pub fn amount(&self) -> Money {
        self.amount
    }

    pub fn split_type(&self) -> SplitPolicy {
        self.split_type
    }

    /// Participants in the order they were recorded
    pub fn participants(&self) -> &[ParticipantShare] {
        &self.participants
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The share belonging to `user_id`, if the user takes part
    pub fn participant(&self, user_id: UserId) -> Option<&ParticipantShare> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    /// Check whether `user_id` is among the participants
    pub fn involves(&self, user_id: UserId) -> bool {
        self.participant(user_id).is_some()
    }

    /// Build an expense without running any checks
    #[cfg(test)]
    pub(crate) fn unchecked(
        amount: Money,
        split_type: SplitPolicy,
        participants: Vec<ParticipantShare>,
    ) -> Self {
        Self {
            id: ExpenseId::new(),
            amount,
            split_type,
            participants,
            description: String::new(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            created_at: Utc::now(),
        }
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({} split, {} participants)",
            self.date.format("%Y-%m-%d"),
            self.amount,
            self.split_type,
            self.participants.len()
        )?;
        if !self.description.is_empty() {
            write!(f, " {}", self.description)?;
        }
        Ok(())
    }
}

/// Unvalidated expense input
///
/// The split policy is kept as the raw string the caller supplied so that an
/// unknown policy surfaces as [`LedgerError::InvalidPolicy`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub amount: Money,
    pub split_type: String,
    pub participants: Vec<ParticipantShare>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl ExpenseDraft {
    /// Create a draft dated today with no description
    pub fn new(
        amount: Money,
        split_type: impl Into<String>,
        participants: Vec<ParticipantShare>,
    ) -> Self {
        Self {
            amount,
            split_type: split_type.into(),
            participants,
            description: String::new(),
            date: None,
        }
    }

    /// Check every policy rule and produce an [`Expense`]
    ///
    /// `percentage_tolerance` is the allowed distance of the percentage sum
    /// from 100.
    pub fn validate(self, percentage_tolerance: Decimal) -> LedgerResult<Expense> {
        let split_type: SplitPolicy = self.split_type.parse()?;

        if !self.amount.is_positive() {
            return Err(LedgerError::InvalidExpense(format!(
                "amount must be positive, got {}",
                self.amount
            )));
        }

        if self.participants.is_empty() {
            return Err(LedgerError::InvalidExpense(
                "an expense needs at least one participant".into(),
            ));
        }

        let mut seen = HashSet::new();
        for participant in &self.participants {
            if !seen.insert(participant.user_id) {
                return Err(LedgerError::InvalidExpense(format!(
                    "participant {} is listed more than once",
                    participant.user_id
                )));
            }
        }

        let expense = Expense {
            id: ExpenseId::new(),
            amount: self.amount,
            split_type,
            participants: self.participants,
            description: self.description.trim().to_string(),
            date: self.date.unwrap_or_else(|| Utc::now().date_naive()),
            created_at: Utc::now(),
        };

        // Per-participant field checks live in the calculator
        split::owed_amounts(&expense)?;

        match split_type {
            SplitPolicy::Equal => {}
            SplitPolicy::Exact => {
                let shares_total =
                    Money::checked_sum(expense.participants.iter().filter_map(|p| p.amount_owed))
                        .ok_or_else(|| {
                            LedgerError::InvalidExpense(
                                "exact shares total is out of range".into(),
                            )
                        })?;
                if shares_total != expense.amount {
                    return Err(LedgerError::InvalidExpense(format!(
                        "exact shares total {} but the expense amount is {}",
                        shares_total, expense.amount
                    )));
                }
            }
            SplitPolicy::Percentage => {
                if !split::validate_percentages(&expense.participants, percentage_tolerance) {
                    let message = match split::percentage_total(&expense.participants) {
                        Some(total) => format!("percentages total {}, expected 100", total),
                        None => "percentages total is out of range".to_string(),
                    };
                    return Err(LedgerError::InvalidExpense(message));
                }
            }
        }

        Ok(expense)
    }
}
