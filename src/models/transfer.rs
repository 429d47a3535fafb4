//! Transfer recommendations and completion records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{GroupId, MemberId};

/// A recommended payment: `from` should pay `to` the given amount.
///
/// Applying a transfer to a set of balances moves `from` up and `to` down by
/// `amount`. Emitted transfers always have `from != to` and `amount > 0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer<Id = MemberId> {
    /// The paying member.
    pub from: Id,
    /// The receiving member.
    pub to: Id,
    /// The amount to pay.
    pub amount: Decimal,
}

impl<Id> Transfer<Id> {
    /// Creates a transfer.
    pub fn new(from: Id, to: Id, amount: Decimal) -> Self {
        Self { from, to, amount }
    }
}

/// Record that a member marked a transfer as done.
///
/// Completions are stored beside the expense ledger. Unless
/// `fold_completed_transfers` is enabled they do not alter computed balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferCompletion {
    /// Unique identifier for the record.
    pub id: Uuid,
    /// The group the transfer settles debt in.
    pub group_id: GroupId,
    /// The paying member.
    pub from: MemberId,
    /// The receiving member.
    pub to: MemberId,
    /// The amount paid.
    pub amount: Decimal,
    /// When the transfer was marked as done.
    pub completed_at: DateTime<Utc>,
}

impl TransferCompletion {
    /// Records a completion of `transfer` at the current time.
    pub fn new(group_id: GroupId, transfer: &Transfer) -> Self {
        Self {
            id: Uuid::new_v4(),
            group_id,
            from: transfer.from.clone(),
            to: transfer.to.clone(),
            amount: transfer.amount,
            completed_at: Utc::now(),
        }
    }

    /// Returns the completion as a transfer.
    pub fn as_transfer(&self) -> Transfer {
        Transfer::new(self.from.clone(), self.to.clone(), self.amount)
    }
}
