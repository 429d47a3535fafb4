//! Balance computation functionality.
//!
//! This module turns an expense ledger into a net balance per member.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use crate::config::SettlementConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Balances, Expense, Participant};

/// Decimal places kept when ordering rounding gaps. Repeated division
/// leaves noise in the last digits of an exact share; it must not decide ties.
const RESIDUAL_ORDER_DP: u32 = 12;

/// Returns one participant's share of an amount split `parts` ways.
///
/// The share is exact to the full precision of [`Decimal`]; nothing is
/// rounded here. Returns `None` when `parts` is zero.
///
/// # Examples
///
/// ```
/// use vaquita_settlement::calculation::equal_share;
/// use rust_decimal::Decimal;
///
/// assert_eq!(equal_share(Decimal::from(90), 3), Some(Decimal::from(30)));
///
/// let third = equal_share(Decimal::from(100), 3).unwrap();
/// assert_eq!(third.round_dp(2), Decimal::new(3333, 2));
/// assert_eq!(equal_share(Decimal::from(100), 0), None);
/// ```
pub fn equal_share(amount: Decimal, parts: usize) -> Option<Decimal> {
    if parts == 0 {
        return None;
    }
    amount.checked_div(Decimal::from(parts))
}

/// Computes the net balance of every member from a list of expenses.
///
/// Every member in `members` starts at zero. For each expense the payer is
/// credited the full amount and every participant is debited
/// `amount / split_between.len()` (see [`equal_share`]), so a payer who also
/// participates ends up credited with the amount minus their own share.
///
/// Balances are accumulated exactly and rounded once at the end. The cents
/// lost or gained by that rounding are handed back one minor unit at a time
/// to the members whose rounding moved them furthest, ties in identifier
/// order, so the result nets to exactly zero and no member is more than one
/// minor unit away from their exact balance.
///
/// # Arguments
///
/// * `expenses` - The ledger, in any order
/// * `members` - The roster defining every valid identifier
/// * `config` - Precision and rounding parameters
///
/// # Errors
///
/// * [`EngineError::DuplicateMember`] if the roster repeats an identifier
/// * [`EngineError::InvalidExpense`] for a non-positive amount or an empty
///   or duplicated split
/// * [`EngineError::InvalidReference`] if a payer or participant is not in
///   the roster
///
/// # Examples
///
/// ```
/// use vaquita_settlement::calculation::compute_balances;
/// use vaquita_settlement::config::SettlementConfig;
/// use vaquita_settlement::models::{Expense, Member, MemberId};
/// use rust_decimal::Decimal;
///
/// let members = vec![Member::new("ana", "Ana"), Member::new("beto", "Beto"), Member::new("carla", "Carla")];
/// let everyone: Vec<MemberId> = members.iter().map(|m| m.id.clone()).collect();
/// let expenses = vec![Expense::new("exp_001", Decimal::from(90), MemberId::new("ana"), everyone)];
///
/// let balances = compute_balances(&expenses, &members, &SettlementConfig::default())?;
/// assert_eq!(balances.get(&MemberId::new("ana")), Some(Decimal::from(60)));
/// assert_eq!(balances.get(&MemberId::new("beto")), Some(Decimal::from(-30)));
/// # Ok::<(), vaquita_settlement::error::EngineError>(())
/// ```
pub fn compute_balances<P>(
    expenses: &[Expense<P::Id>],
    members: &[P],
    config: &SettlementConfig,
) -> EngineResult<Balances<P::Id>>
where
    P: Participant,
{
    let mut exact: BTreeMap<P::Id, Decimal> = BTreeMap::new();
    for member in members {
        if exact.insert(member.id().clone(), Decimal::ZERO).is_some() {
            return Err(EngineError::DuplicateMember {
                member_id: member.id().to_string(),
            });
        }
    }

    for expense in expenses {
        let amount = validate_expense(expense, &exact, config)?;
        let share = equal_share(amount, expense.split_between.len()).ok_or_else(|| {
            EngineError::InvalidExpense {
                expense_id: expense.id.clone(),
                message: "split_between must not be empty".to_string(),
            }
        })?;

        if let Some(balance) = exact.get_mut(&expense.paid_by) {
            *balance += amount;
        }
        for participant in &expense.split_between {
            if let Some(balance) = exact.get_mut(participant) {
                *balance -= share;
            }
        }
    }

    let entries = quantize_balances(exact, config);
    debug_assert!(entries.values().copied().sum::<Decimal>().is_zero());

    Ok(Balances::from_entries(entries))
}

/// Rounds exact balances once and returns the rounding residual one minor
/// unit at a time, largest rounding gap first.
fn quantize_balances<Id: Ord>(exact: BTreeMap<Id, Decimal>, config: &SettlementConfig) -> BTreeMap<Id, Decimal> {
    let unit = config.tolerance();

    // (id, rounded value, how far rounding moved it up)
    let mut rounded: Vec<(Id, Decimal, Decimal)> = exact
        .into_iter()
        .map(|(id, value)| {
            let quantized = config.round(value);
            let gap = (quantized - value).round_dp(RESIDUAL_ORDER_DP);
            (id, quantized, gap)
        })
        .collect();

    let mut residual: Decimal = rounded.iter().map(|(_, value, _)| *value).sum();
    if !residual.is_zero() {
        let mut order: Vec<usize> = (0..rounded.len()).collect();
        let step = if residual > Decimal::ZERO {
            order.sort_by(|a, b| rounded[*b].2.cmp(&rounded[*a].2));
            -unit
        } else {
            order.sort_by(|a, b| rounded[*a].2.cmp(&rounded[*b].2));
            unit
        };

        for index in order {
            if residual.abs() < unit {
                break;
            }
            rounded[index].1 += step;
            residual += step;
        }
    }

    rounded.into_iter().map(|(id, value, _)| (id, value)).collect()
}

/// Checks an expense against the roster and returns its quantized amount.
fn validate_expense<Id>(
    expense: &Expense<Id>,
    roster: &BTreeMap<Id, Decimal>,
    config: &SettlementConfig,
) -> EngineResult<Decimal>
where
    Id: Ord + std::fmt::Display,
{
    let amount = config.round(expense.amount);
    if amount <= Decimal::ZERO {
        return Err(EngineError::InvalidExpense {
            expense_id: expense.id.clone(),
            message: format!("amount must be positive, got {}", expense.amount),
        });
    }

    if expense.split_between.is_empty() {
        return Err(EngineError::InvalidExpense {
            expense_id: expense.id.clone(),
            message: "split_between must not be empty".to_string(),
        });
    }

    if !roster.contains_key(&expense.paid_by) {
        return Err(EngineError::InvalidReference {
            context: format!("Expense '{}'", expense.id),
            member_id: expense.paid_by.to_string(),
            role: "payer".to_string(),
        });
    }

    let mut seen = BTreeSet::new();
    for participant in &expense.split_between {
        if !roster.contains_key(participant) {
            return Err(EngineError::InvalidReference {
                context: format!("Expense '{}'", expense.id),
                member_id: participant.to_string(),
                role: "participant".to_string(),
            });
        }
        if !seen.insert(participant) {
            return Err(EngineError::InvalidExpense {
                expense_id: expense.id.clone(),
                message: format!("participant '{}' is listed more than once", participant),
            });
        }
    }

    Ok(amount)
}
