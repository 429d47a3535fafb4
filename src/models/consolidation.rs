//! Cross-group consolidation views.
//!
//! These types describe a single member's position across every group they
//! belong to, built from each group's own transfer plan.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{GroupId, MemberId, Transfer};

/// The transfer plan of one group, labelled for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTransfers<Id = MemberId> {
    /// The group the plan belongs to.
    pub group_id: GroupId,
    /// Display name of the group.
    pub group_name: String,
    /// The group's transfers.
    pub transfers: Vec<Transfer<Id>>,
}

/// Which way money flows between the viewer and a counterparty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The viewer pays the counterparty.
    Owes,
    /// The counterparty pays the viewer.
    IsOwed,
}

/// One group's contribution to a consolidated counterparty total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupShare {
    /// The contributing group.
    pub group_id: GroupId,
    /// Display name of the group.
    pub group_name: String,
    /// The amount from this group.
    pub amount: Decimal,
}

/// Everything flowing between the viewer and one counterparty in one direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterpartyTotal<Id = MemberId> {
    /// The other member.
    pub counterparty: Id,
    /// Whether the viewer pays or receives.
    pub direction: Direction,
    /// Sum over every group.
    pub total: Decimal,
    /// Per-group amounts, in the order the groups were supplied.
    pub breakdown: Vec<GroupShare>,
}

/// A member's consolidated position across groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedView<Id = MemberId> {
    /// The member the view is built for.
    pub viewer: Id,
    /// Counterparty totals ordered by counterparty, then direction.
    pub entries: Vec<CounterpartyTotal<Id>>,
    /// Total the viewer has to pay.
    pub total_owing: Decimal,
    /// Total the viewer has to receive.
    pub total_owed: Decimal,
}

impl<Id> ConsolidatedView<Id> {
    /// Net position: positive if the viewer receives more than they pay.
    pub fn net(&self) -> Decimal {
        self.total_owed - self.total_owing
    }

    /// Entries where the viewer pays.
    pub fn owes(&self) -> impl Iterator<Item = &CounterpartyTotal<Id>> {
        self.entries.iter().filter(|entry| entry.direction == Direction::Owes)
    }

    /// Entries where the viewer receives.
    pub fn owed(&self) -> impl Iterator<Item = &CounterpartyTotal<Id>> {
        self.entries.iter().filter(|entry| entry.direction == Direction::IsOwed)
    }

    /// Returns true if the viewer has nothing to pay or receive.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
