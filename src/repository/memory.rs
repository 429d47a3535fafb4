//! In-memory ledger repository.

use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{EngineError, EngineResult};
use crate::models::{Expense, Group, GroupId, MemberId, TransferCompletion};

use super::LedgerRepository;

#[derive(Debug, Default)]
struct LedgerState {
    groups: BTreeMap<GroupId, Group>,
    expenses: HashMap<GroupId, Vec<Expense>>,
    completions: HashMap<GroupId, Vec<TransferCompletion>>,
}

impl LedgerState {
    fn require_group(&self, group_id: &GroupId) -> EngineResult<&Group> {
        self.groups.get(group_id).ok_or_else(|| EngineError::GroupNotFound {
            group_id: group_id.to_string(),
        })
    }
}

/// A [`LedgerRepository`] that keeps everything in process memory.
///
/// Safe to share between threads; reads take a shared lock.
///
/// # Example
///
/// ```
/// use vaquita_settlement::models::{Expense, Group, GroupId, Member, MemberId};
/// use vaquita_settlement::repository::{InMemoryLedgerRepository, LedgerRepository};
/// use rust_decimal::Decimal;
///
/// let repository = InMemoryLedgerRepository::new();
/// repository.insert_group(Group::new("asado", "Asado", vec![Member::new("ana", "Ana")]))?;
/// repository.add_expense(
///     &GroupId::new("asado"),
///     Expense::new("e1", Decimal::TEN, MemberId::new("ana"), vec![MemberId::new("ana")]),
/// )?;
///
/// assert_eq!(repository.load_expenses(&GroupId::new("asado"))?.len(), 1);
/// # Ok::<(), vaquita_settlement::error::EngineError>(())
/// ```
#[derive(Debug, Default)]
pub struct InMemoryLedgerRepository {
    state: RwLock<LedgerState>,
}

impl InMemoryLedgerRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> EngineResult<RwLockReadGuard<'_, LedgerState>> {
        self.state.read().map_err(|_| EngineError::RepositoryError {
            message: "ledger state lock poisoned".to_string(),
        })
    }

    fn write(&self) -> EngineResult<RwLockWriteGuard<'_, LedgerState>> {
        self.state.write().map_err(|_| EngineError::RepositoryError {
            message: "ledger state lock poisoned".to_string(),
        })
    }

    /// Inserts or replaces a group.
    pub fn insert_group(&self, group: Group) -> EngineResult<()> {
        let mut state = self.write()?;
        state.groups.insert(group.id.clone(), group);
        Ok(())
    }

    /// Logs an expense in an existing group.
    pub fn add_expense(&self, group_id: &GroupId, expense: Expense) -> EngineResult<()> {
        let mut state = self.write()?;
        state.require_group(group_id)?;
        state.expenses.entry(group_id.clone()).or_default().push(expense);
        Ok(())
    }
}

impl LedgerRepository for InMemoryLedgerRepository {
    fn load_group(&self, group_id: &GroupId) -> EngineResult<Group> {
        self.read()?.require_group(group_id).cloned()
    }

    fn load_expenses(&self, group_id: &GroupId) -> EngineResult<Vec<Expense>> {
        let state = self.read()?;
        state.require_group(group_id)?;
        Ok(state.expenses.get(group_id).cloned().unwrap_or_default())
    }

    fn load_completions(&self, group_id: &GroupId) -> EngineResult<Vec<TransferCompletion>> {
        let state = self.read()?;
        state.require_group(group_id)?;
        Ok(state.completions.get(group_id).cloned().unwrap_or_default())
    }

    fn save_completion(&self, completion: TransferCompletion) -> EngineResult<()> {
        let mut state = self.write()?;
        state.require_group(&completion.group_id)?;
        state
            .completions
            .entry(completion.group_id.clone())
            .or_default()
            .push(completion);
        Ok(())
    }

    fn groups_for_member(&self, member_id: &MemberId) -> EngineResult<Vec<GroupId>> {
        let state = self.read()?;
        Ok(state
            .groups
            .values()
            .filter(|group| group.contains(member_id))
            .map(|group| group.id.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Member, Transfer};
    use rust_decimal::Decimal;

    fn create_test_repository() -> InMemoryLedgerRepository {
        let repository = InMemoryLedgerRepository::new();
        repository
            .insert_group(Group::new(
                "asado",
                "Asado",
                vec![Member::new("ana", "Ana"), Member::new("beto", "Beto")],
            ))
            .unwrap();
        repository
            .insert_group(Group::new(
                "viaje",
                "Viaje",
                vec![Member::new("beto", "Beto"), Member::new("carla", "Carla")],
            ))
            .unwrap();
        repository
    }

    #[test]
    fn test_load_unknown_group_returns_error() {
        let repository = create_test_repository();
        let result = repository.load_group(&GroupId::new("missing"));
        assert!(matches!(result, Err(EngineError::GroupNotFound { group_id }) if group_id == "missing"));
    }

    #[test]
    fn test_load_expenses_of_group_without_expenses_is_empty() {
        let repository = create_test_repository();
        assert!(repository.load_expenses(&GroupId::new("asado")).unwrap().is_empty());
    }

    #[test]
    fn test_add_expense_to_unknown_group_fails() {
        let repository = create_test_repository();
        let expense = Expense::new("e1", Decimal::ONE, MemberId::new("ana"), vec![MemberId::new("ana")]);
        let result = repository.add_expense(&GroupId::new("missing"), expense);
        assert!(matches!(result, Err(EngineError::GroupNotFound { .. })));
    }

    #[test]
    fn test_groups_for_member_in_id_order() {
        let repository = create_test_repository();
        assert_eq!(
            repository.groups_for_member(&MemberId::new("beto")).unwrap(),
            vec![GroupId::new("asado"), GroupId::new("viaje")]
        );
        assert_eq!(
            repository.groups_for_member(&MemberId::new("carla")).unwrap(),
            vec![GroupId::new("viaje")]
        );
        assert!(repository.groups_for_member(&MemberId::new("zoe")).unwrap().is_empty());
    }

    #[test]
    fn test_completions_are_stored_per_group() {
        let repository = create_test_repository();
        let transfer = Transfer::new(MemberId::new("beto"), MemberId::new("ana"), Decimal::TEN);
        repository
            .save_completion(TransferCompletion::new(GroupId::new("asado"), &transfer))
            .unwrap();

        assert_eq!(repository.load_completions(&GroupId::new("asado")).unwrap().len(), 1);
        assert!(repository.load_completions(&GroupId::new("viaje")).unwrap().is_empty());
    }

    #[test]
    fn test_repository_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InMemoryLedgerRepository>();
    }
}
