//! Split calculator
//!
//! Derives what each participant owes on a single expense. Everything here is
//! a pure function of its inputs: no storage access, no logging.
//!
//! Rounding is to whole cents with midpoints away from zero. Under an equal
//! split every participant gets the same rounded share and the leftover
//! cent(s) are not redistributed, so the shares can differ from the expense
//! amount by at most half a cent per participant.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Expense, Money, ParticipantShare, SplitPolicy, UserId};

/// Default allowed distance of a percentage sum from 100
pub const DEFAULT_PERCENTAGE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// A participant's computed share of one expense
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OwedAmount {
    pub user_id: UserId,
    pub amount: Money,
}

/// Compute what `participant` owes on `expense`
///
/// # Errors
///
/// - `InvalidExpense` if the expense has no participants
/// - `InvalidSplitData` if the participant is not part of the expense, or
///   lacks the field the policy needs, or that field is out of range
pub fn owed_amount(expense: &Expense, participant: &ParticipantShare) -> LedgerResult<Money> {
    let count = expense.participant_count();
    if count == 0 {
        return Err(LedgerError::InvalidExpense(format!(
            "expense {} has no participants",
            expense.id()
        )));
    }

    if !expense.involves(participant.user_id) {
        return Err(LedgerError::split_data(
            participant.user_id,
            format!("not a participant of expense {}", expense.id()),
        ));
    }

    match expense.split_type() {
        SplitPolicy::Equal => equal_share(expense.amount(), count),
        SplitPolicy::Exact => exact_share(participant),
        SplitPolicy::Percentage => percentage_share(expense.amount(), participant),
    }
}

/// Compute every participant's share, in participant order
pub fn owed_amounts(expense: &Expense) -> LedgerResult<Vec<OwedAmount>> {
    if expense.participants().is_empty() {
        return Err(LedgerError::InvalidExpense(format!(
            "expense {} has no participants",
            expense.id()
        )));
    }

    expense
        .participants()
        .iter()
        .map(|p| {
            Ok(OwedAmount {
                user_id: p.user_id,
                amount: owed_amount(expense, p)?,
            })
        })
        .collect()
}

/// Check that the participants' percentages add up to 100
///
/// Returns false if any participant has no percentage. The sum may be off by
/// at most `tolerance` (inclusive) so that entries like 33.33 / 33.33 / 33.33
/// are accepted.
pub fn validate_percentages(participants: &[ParticipantShare], tolerance: Decimal) -> bool {
    if participants.iter().any(|p| p.percentage.is_none()) {
        return false;
    }

    match percentage_total(participants) {
        Some(total) => (total - Decimal::ONE_HUNDRED).abs() <= tolerance,
        None => false,
    }
}

/// Sum of the percentages that are present, or `None` if it overflows
pub fn percentage_total(participants: &[ParticipantShare]) -> Option<Decimal> {
    participants
        .iter()
        .filter_map(|p| p.percentage)
        .try_fold(Decimal::ZERO, |acc, pct| acc.checked_add(pct))
}

fn equal_share(amount: Money, count: usize) -> LedgerResult<Money> {
    let share = amount.to_decimal() / Decimal::from(count as u64);
    Money::from_decimal_rounded(share)
        .ok_or_else(|| LedgerError::InvalidExpense(format!("amount {} is out of range", amount)))
}

fn exact_share(participant: &ParticipantShare) -> LedgerResult<Money> {
    match participant.amount_owed {
        None => Err(LedgerError::split_data(
            participant.user_id,
            "an exact split needs an amount owed",
        )),
        Some(amount) if amount.is_negative() => Err(LedgerError::split_data(
            participant.user_id,
            format!("amount owed cannot be negative, got {}", amount),
        )),
        Some(amount) => Ok(amount),
    }
}

fn percentage_share(amount: Money, participant: &ParticipantShare) -> LedgerResult<Money> {
    let percentage = participant.percentage.ok_or_else(|| {
        LedgerError::split_data(participant.user_id, "a percentage split needs a percentage")
    })?;

    if percentage < Decimal::ZERO || percentage > Decimal::ONE_HUNDRED {
        return Err(LedgerError::split_data(
            participant.user_id,
            format!("percentage must be between 0 and 100, got {}", percentage),
        ));
    }

    amount
        .to_decimal()
        .checked_mul(percentage)
        .map(|scaled| scaled / Decimal::ONE_HUNDRED)
        .and_then(Money::from_decimal_rounded)
        .ok_or_else(|| LedgerError::InvalidExpense(format!("amount {} is out of range", amount)))
}
