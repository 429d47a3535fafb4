//! Ledger persistence boundary.
//!
//! The settlement engine never touches storage itself. Callers inject a
//! [`LedgerRepository`] that loads rosters and expenses and records
//! transfer completions; [`InMemoryLedgerRepository`] is the bundled
//! implementation.

mod memory;

use std::sync::Arc;

use crate::error::EngineResult;
use crate::models::{Expense, Group, GroupId, MemberId, TransferCompletion};

pub use memory::InMemoryLedgerRepository;

/// Source of group ledgers and sink for completion records.
pub trait LedgerRepository: Send + Sync {
    /// Loads a group and its roster.
    fn load_group(&self, group_id: &GroupId) -> EngineResult<Group>;

    /// Loads every expense logged in a group.
    fn load_expenses(&self, group_id: &GroupId) -> EngineResult<Vec<Expense>>;

    /// Loads every transfer marked as completed in a group.
    fn load_completions(&self, group_id: &GroupId) -> EngineResult<Vec<TransferCompletion>>;

    /// Stores a completion record.
    fn save_completion(&self, completion: TransferCompletion) -> EngineResult<()>;

    /// Lists the groups a member belongs to.
    fn groups_for_member(&self, member_id: &MemberId) -> EngineResult<Vec<GroupId>>;
}

impl<R: LedgerRepository + ?Sized> LedgerRepository for Arc<R> {
    fn load_group(&self, group_id: &GroupId) -> EngineResult<Group> {
        (**self).load_group(group_id)
    }

    fn load_expenses(&self, group_id: &GroupId) -> EngineResult<Vec<Expense>> {
        (**self).load_expenses(group_id)
    }

    fn load_completions(&self, group_id: &GroupId) -> EngineResult<Vec<TransferCompletion>> {
        (**self).load_completions(group_id)
    }

    fn save_completion(&self, completion: TransferCompletion) -> EngineResult<()> {
        (**self).save_completion(completion)
    }

    fn groups_for_member(&self, member_id: &MemberId) -> EngineResult<Vec<GroupId>> {
        (**self).groups_for_member(member_id)
    }
}
