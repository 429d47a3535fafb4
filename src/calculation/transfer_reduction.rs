//! Debt settlement: reducing balances to a list of transfers.
//!
//! The reduction is greedy: the member who owes the most always pays the
//! member who is owed the most, until nobody owes anything. This does not
//! guarantee the theoretical minimum number of transfers, but it is
//! deterministic and produces at most `debtors + creditors - 1` transfers.

use std::fmt;

use rust_decimal::Decimal;
use tracing::{debug, error};

use crate::config::SettlementConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{Balances, Transfer};

/// A debtor or creditor with what is still left to settle.
struct OpenPosition<'a, Id> {
    id: &'a Id,
    remaining: Decimal,
}

fn sort_largest_first<Id>(positions: &mut [OpenPosition<'_, Id>]) {
    // Stable, so equal amounts keep identifier order.
    positions.sort_by(|a, b| b.remaining.cmp(&a.remaining));
}

/// Reduces balances to transfers that settle every member.
///
/// Members owing at least one minor unit are debtors, members owed at least
/// one minor unit are creditors, everyone else is already settled. While
/// both sides are non-empty the largest debtor pays the largest creditor
/// `min(debt, credit)`; whoever reaches zero drops out.
///
/// # Arguments
///
/// * `balances` - Net balances; they net to zero within one minor unit
/// * `config` - Precision and rounding parameters
///
/// # Returns
///
/// The transfers in emission order. Applying all of them zeroes every
/// balance, except that a rounding residual of one minor unit carried by the
/// balances stays with the member who holds it. Ties between equal amounts
/// follow identifier order.
///
/// # Examples
///
/// ```
/// use vaquita_settlement::calculation::reduce_to_transfers;
/// use vaquita_settlement::config::SettlementConfig;
/// use vaquita_settlement::models::Balances;
/// use rust_decimal::Decimal;
///
/// let config = SettlementConfig::default();
/// let balances = Balances::from_map(
///     [("ana", Decimal::from(60)), ("beto", Decimal::from(-30)), ("carla", Decimal::from(-30))],
///     &config,
/// )?;
///
/// let transfers = reduce_to_transfers(&balances, &config);
/// assert_eq!(transfers.len(), 2);
/// assert_eq!((transfers[0].from, transfers[0].to), ("beto", "ana"));
/// assert_eq!(transfers[0].amount, Decimal::from(30));
/// # Ok::<(), vaquita_settlement::error::EngineError>(())
/// ```
pub fn reduce_to_transfers<Id>(balances: &Balances<Id>, config: &SettlementConfig) -> Vec<Transfer<Id>>
where
    Id: Ord + Clone + fmt::Display,
{
    let tolerance = config.tolerance();

    let mut debtors: Vec<OpenPosition<'_, Id>> = balances
        .iter()
        .filter(|(_, balance)| *balance <= -tolerance)
        .map(|(id, balance)| OpenPosition {
            id,
            remaining: -balance,
        })
        .collect();
    let mut creditors: Vec<OpenPosition<'_, Id>> = balances
        .iter()
        .filter(|(_, balance)| *balance >= tolerance)
        .map(|(id, balance)| OpenPosition {
            id,
            remaining: balance,
        })
        .collect();

    let mut transfers = Vec::with_capacity(debtors.len() + creditors.len());

    loop {
        sort_largest_first(&mut debtors);
        sort_largest_first(&mut creditors);

        let (Some(debtor), Some(creditor)) = (debtors.first_mut(), creditors.first_mut()) else {
            break;
        };

        let amount = config.round(debtor.remaining.min(creditor.remaining));
        if amount >= tolerance {
            transfers.push(Transfer::new(debtor.id.clone(), creditor.id.clone(), amount));
        }

        debtor.remaining -= amount;
        creditor.remaining -= amount;

        let debtor_settled = debtor.remaining < tolerance;
        let creditor_settled = creditor.remaining < tolerance;
        if debtor_settled {
            debtors.remove(0);
        }
        if creditor_settled {
            creditors.remove(0);
        }
    }

    // Whatever is left sits on one side only and equals the balances'
    // rounding residual, which construction caps at one minor unit.
    let unsettled: Decimal = debtors
        .iter()
        .chain(creditors.iter())
        .map(|position| position.remaining)
        .sum();
    let leftover: Vec<String> = debtors
        .iter()
        .chain(creditors.iter())
        .map(|position| format!("{}={}", position.id, position.remaining))
        .collect();
    if unsettled > tolerance {
        error!(leftover = ?leftover, "Balances did not net to zero; settlement is incomplete");
    } else if !leftover.is_empty() {
        debug!(leftover = ?leftover, "Rounding residual left unsettled");
    }
    debug_assert!(unsettled <= tolerance, "unsettled members after reduction: {:?}", leftover);

    transfers
}

/// Applies transfers to balances.
///
/// Each transfer moves `from` up and `to` down by its amount, so the total
/// is unchanged. Useful for checking that a plan settles a ledger and
/// for folding completed transfers into fresh balances.
///
/// # Errors
///
/// Returns [`EngineError::InvalidReference`] if either end of a transfer has
/// no balance entry.
pub fn apply_transfers<Id>(balances: &Balances<Id>, transfers: &[Transfer<Id>]) -> EngineResult<Balances<Id>>
where
    Id: Ord + Clone + fmt::Display,
{
    let mut applied = balances.clone();

    for transfer in transfers {
        let context = || format!("Transfer {} -> {}", transfer.from, transfer.to);

        let from = applied.get_mut(&transfer.from).ok_or_else(|| EngineError::InvalidReference {
            context: context(),
            member_id: transfer.from.to_string(),
            role: "sender".to_string(),
        })?;
        *from += transfer.amount;

        let to = applied.get_mut(&transfer.to).ok_or_else(|| EngineError::InvalidReference {
            context: context(),
            member_id: transfer.to.to_string(),
            role: "recipient".to_string(),
        })?;
        *to -= transfer.amount;
    }

    Ok(applied)
}
