//! Consolidation of per-group transfer plans for one member.
//!
//! Consolidation is a reporting view: it sums transfers that were already
//! computed group by group and never re-runs the matching globally, so the
//! totals can differ from settling the union of all balances at once.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::models::{ConsolidatedView, CounterpartyTotal, Direction, GroupShare, GroupTransfers};

/// Builds a member's consolidated position across groups.
///
/// Every transfer in which `viewer` is the sender or the recipient is grouped
/// by counterparty and direction; amounts are summed while the per-group
/// amounts are kept in `breakdown`.
///
/// # Examples
///
/// ```
/// use vaquita_settlement::calculation::consolidate_for_member;
/// use vaquita_settlement::models::{Direction, GroupId, GroupTransfers, Transfer};
/// use rust_decimal::Decimal;
///
/// let groups = vec![
///     GroupTransfers {
///         group_id: GroupId::new("asado"),
///         group_name: "Asado".to_string(),
///         transfers: vec![Transfer::new("beto", "ana", Decimal::from(30))],
///     },
///     GroupTransfers {
///         group_id: GroupId::new("viaje"),
///         group_name: "Viaje".to_string(),
///         transfers: vec![Transfer::new("beto", "ana", Decimal::from(12))],
///     },
/// ];
///
/// let view = consolidate_for_member(&"ana", &groups);
/// assert_eq!(view.entries.len(), 1);
/// assert_eq!(view.entries[0].direction, Direction::IsOwed);
/// assert_eq!(view.entries[0].total, Decimal::from(42));
/// assert_eq!(view.entries[0].breakdown.len(), 2);
/// ```
pub fn consolidate_for_member<Id>(viewer: &Id, groups: &[GroupTransfers<Id>]) -> ConsolidatedView<Id>
where
    Id: Ord + Clone,
{
    let mut totals: BTreeMap<(Id, Direction), CounterpartyTotal<Id>> = BTreeMap::new();

    for group in groups {
        for transfer in &group.transfers {
            let (counterparty, direction) = if &transfer.from == viewer && &transfer.to != viewer {
                (&transfer.to, Direction::Owes)
            } else if &transfer.to == viewer && &transfer.from != viewer {
                (&transfer.from, Direction::IsOwed)
            } else {
                continue;
            };

            let entry = totals
                .entry((counterparty.clone(), direction))
                .or_insert_with(|| CounterpartyTotal {
                    counterparty: counterparty.clone(),
                    direction,
                    total: Decimal::ZERO,
                    breakdown: Vec::new(),
                });

            entry.total += transfer.amount;
            match entry.breakdown.last_mut() {
                Some(share) if share.group_id == group.group_id => share.amount += transfer.amount,
                _ => entry.breakdown.push(GroupShare {
                    group_id: group.group_id.clone(),
                    group_name: group.group_name.clone(),
                    amount: transfer.amount,
                }),
            }
        }
    }

    let entries: Vec<CounterpartyTotal<Id>> = totals.into_values().collect();
    let total_owing = entries
        .iter()
        .filter(|entry| entry.direction == Direction::Owes)
        .map(|entry| entry.total)
        .sum();
    let total_owed = entries
        .iter()
        .filter(|entry| entry.direction == Direction::IsOwed)
        .map(|entry| entry.total)
        .sum();

    ConsolidatedView {
        viewer: viewer.clone(),
        entries,
        total_owing,
        total_owed,
    }
}
