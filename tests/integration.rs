//! Integration tests for the settlement engine.
//!
//! This test suite covers:
//! - Balance computation scenarios (equal split, partial overlap, rounding)
//! - Transfer reduction and settlement completeness
//! - Consolidation across groups
//! - The settlement service over the in-memory repository
//! - Configuration loading
//! - Error cases

use std::collections::BTreeSet;
use std::str::FromStr;

use rust_decimal::Decimal;

use vaquita_settlement::calculation::{apply_transfers, compute_balances, reduce_to_transfers};
use vaquita_settlement::config::{ConfigLoader, SettlementConfig};
use vaquita_settlement::error::EngineError;
use vaquita_settlement::models::{
    Balances, Direction, Expense, Group, GroupId, Member, MemberId, SettlementResult, Transfer,
};
use vaquita_settlement::repository::{InMemoryLedgerRepository, LedgerRepository};
use vaquita_settlement::service::SettlementService;

// =============================================================================
// Test Helpers
// =============================================================================

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn id(s: &str) -> MemberId {
    MemberId::new(s)
}

fn abc_roster() -> Vec<Member> {
    vec![
        Member::new("a", "Ana").with_payment_alias("ana.mp"),
        Member::new("b", "Beto"),
        Member::new("c", "Carla").with_payment_alias("carla.cvu"),
    ]
}

fn expense(expense_id: &str, amount: &str, paid_by: &str, split: &[&str]) -> Expense {
    Expense::new(expense_id, dec(amount), id(paid_by), split.iter().map(|s| id(s)).collect())
}

fn transfer_set(transfers: &[Transfer]) -> BTreeSet<(String, String, Decimal)> {
    transfers
        .iter()
        .map(|t| (t.from.to_string(), t.to.to_string(), t.amount))
        .collect()
}

fn expected_set(entries: &[(&str, &str, &str)]) -> BTreeSet<(String, String, Decimal)> {
    entries
        .iter()
        .map(|(from, to, amount)| (from.to_string(), to.to_string(), dec(amount)))
        .collect()
}

fn settle(expenses: &[Expense]) -> (Balances, Vec<Transfer>) {
    let config = SettlementConfig::default();
    let balances = compute_balances(expenses, &abc_roster(), &config).unwrap();
    let transfers = reduce_to_transfers(&balances, &config);
    (balances, transfers)
}

fn assert_settles(balances: &Balances, transfers: &[Transfer]) {
    let config = SettlementConfig::default();
    let applied = apply_transfers(balances, transfers).unwrap();
    assert!(applied.is_settled(&config), "Plan left balances open: {:?}", applied);
    for transfer in transfers {
        assert_ne!(transfer.from, transfer.to);
        assert!(transfer.amount > Decimal::ZERO);
    }
}

fn create_repository() -> InMemoryLedgerRepository {
    let repository = InMemoryLedgerRepository::new();
    repository
        .insert_group(Group::new("asado", "Asado", abc_roster()))
        .unwrap();
    repository
        .insert_group(Group::new(
            "viaje",
            "Viaje a Mendoza",
            vec![Member::new("a", "Ana"), Member::new("b", "Beto"), Member::new("d", "Dario")],
        ))
        .unwrap();

    let asado = GroupId::new("asado");
    repository.add_expense(&asado, expense("e1", "90", "a", &["a", "b", "c"])).unwrap();

    let viaje = GroupId::new("viaje");
    repository.add_expense(&viaje, expense("v1", "120", "d", &["a", "b", "d"])).unwrap();
    repository.add_expense(&viaje, expense("v2", "30", "a", &["a", "b", "d"])).unwrap();

    repository
}

// =============================================================================
// Balance and Transfer Scenarios
// =============================================================================

#[test]
fn test_single_payer_equal_split() {
    let (balances, transfers) = settle(&[expense("e1", "90", "a", &["a", "b", "c"])]);

    assert_eq!(balances.get(&id("a")), Some(dec("60")));
    assert_eq!(balances.get(&id("b")), Some(dec("-30")));
    assert_eq!(balances.get(&id("c")), Some(dec("-30")));
    assert_eq!(transfer_set(&transfers), expected_set(&[("b", "a", "30"), ("c", "a", "30")]));
    assert_settles(&balances, &transfers);
}

#[test]
fn test_already_settled_ledger() {
    let (balances, transfers) = settle(&[
        expense("e1", "30", "a", &["a", "b", "c"]),
        expense("e2", "30", "b", &["a", "b", "c"]),
        expense("e3", "30", "c", &["a", "b", "c"]),
    ]);

    assert!(balances.iter().all(|(_, value)| value.is_zero()));
    assert!(transfers.is_empty());
}

#[test]
fn test_partial_overlap() {
    let (balances, transfers) = settle(&[
        expense("e1", "100", "a", &["a", "b"]),
        expense("e2", "50", "b", &["b", "c"]),
    ]);

    assert_eq!(balances.get(&id("a")), Some(dec("50")));
    assert_eq!(balances.get(&id("b")), Some(dec("-25")));
    assert_eq!(balances.get(&id("c")), Some(dec("-25")));
    assert_eq!(transfer_set(&transfers), expected_set(&[("b", "a", "25"), ("c", "a", "25")]));
    assert_settles(&balances, &transfers);
}

#[test]
fn test_rounding_of_uneven_split() {
    let (balances, transfers) = settle(&[expense("e1", "100", "a", &["a", "b", "c"])]);

    // Rounded once, the three balances overshoot by a cent; it goes back to
    // the first member in id order.
    assert_eq!(balances.get(&id("a")), Some(dec("66.66")));
    assert_eq!(balances.get(&id("b")), Some(dec("-33.33")));
    assert_eq!(balances.get(&id("c")), Some(dec("-33.33")));
    assert!(balances.total().is_zero());

    assert_eq!(
        transfer_set(&transfers),
        expected_set(&[("b", "a", "33.33"), ("c", "a", "33.33")])
    );
    assert_settles(&balances, &transfers);
}

#[test]
fn test_mixed_ledger_settles_completely() {
    let (balances, transfers) = settle(&[
        expense("e1", "1234.56", "a", &["a", "b", "c"]),
        expense("e2", "99.99", "b", &["a", "c"]),
        expense("e3", "10.01", "c", &["b"]),
        expense("e4", "0.07", "a", &["b", "c"]),
    ]);

    assert!(balances.total().is_zero());
    assert!(transfers.len() <= 2);
    assert_settles(&balances, &transfers);
}

#[test]
fn test_balances_from_external_map() {
    let config = SettlementConfig::default();
    let balances = Balances::from_map(
        [(id("a"), dec("70")), (id("b"), dec("30")), (id("c"), dec("-100"))],
        &config,
    )
    .unwrap();

    let transfers = reduce_to_transfers(&balances, &config);

    assert_eq!(
        transfers,
        vec![
            Transfer::new(id("c"), id("a"), dec("70")),
            Transfer::new(id("c"), id("b"), dec("30")),
        ]
    );
}

#[test]
fn test_balances_rounded_per_member_settle_within_a_cent() {
    let config = SettlementConfig::default();
    // Each balance rounded on its own: 66.666.. -> 66.67, -33.333.. -> -33.33.
    let balances = Balances::from_map(
        [(id("a"), dec("66.67")), (id("b"), dec("-33.33")), (id("c"), dec("-33.33"))],
        &config,
    )
    .unwrap();

    let transfers = reduce_to_transfers(&balances, &config);

    assert_eq!(
        transfer_set(&transfers),
        expected_set(&[("b", "a", "33.33"), ("c", "a", "33.33")])
    );
    let applied = apply_transfers(&balances, &transfers).unwrap();
    assert!(applied.iter().all(|(_, value)| value.abs() <= config.tolerance()));
}

#[test]
fn test_repeated_uneven_expense_matches_exact_split() {
    let expenses: Vec<Expense> = (0..100)
        .map(|n| expense(&format!("e{n}"), "10", "a", &["b", "c", "a"]))
        .collect();

    let (balances, transfers) = settle(&expenses);

    assert_eq!(balances.get(&id("b")), Some(dec("-333.33")));
    assert_eq!(balances.get(&id("c")), Some(dec("-333.33")));
    assert_eq!(balances.get(&id("a")), Some(dec("666.66")));
    assert_eq!(
        transfer_set(&transfers),
        expected_set(&[("b", "a", "333.33"), ("c", "a", "333.33")])
    );
    assert_settles(&balances, &transfers);
}

#[test]
fn test_unbalanced_result_json_is_rejected() {
    let service = SettlementService::with_settings(create_repository(), SettlementConfig::default(), "ARS");
    let result = service.settle_group(&GroupId::new("asado")).unwrap();

    let mut value = serde_json::to_value(&result).unwrap();
    value["balances"]["a"] = serde_json::Value::String("70".to_string());

    let parsed = serde_json::from_value::<SettlementResult>(value);
    assert!(parsed.is_err());
}

// =============================================================================
// Error Cases
// =============================================================================

#[test]
fn test_error_unknown_payer() {
    let config = SettlementConfig::default();
    let result = compute_balances(&[expense("e9", "10", "zoe", &["a"])], &abc_roster(), &config);

    let err = result.unwrap_err();
    assert!(matches!(err, EngineError::InvalidReference { .. }));
    assert_eq!(err.to_string(), "Expense 'e9' references unknown payer 'zoe'");
}

#[test]
fn test_error_empty_split() {
    let config = SettlementConfig::default();
    let result = compute_balances(&[expense("e1", "10", "a", &[])], &abc_roster(), &config);
    assert!(matches!(result, Err(EngineError::InvalidExpense { .. })));
}

#[test]
fn test_error_non_positive_amount() {
    let config = SettlementConfig::default();
    let result = compute_balances(&[expense("e1", "-1", "a", &["a", "b"])], &abc_roster(), &config);
    assert!(matches!(result, Err(EngineError::InvalidExpense { .. })));
}

#[test]
fn test_error_unbalanced_external_balances() {
    let config = SettlementConfig::default();
    let result = Balances::from_map([(id("a"), dec("10")), (id("b"), dec("-9"))], &config);
    assert!(matches!(result, Err(EngineError::UnbalancedLedger { .. })));
}

// =============================================================================
// Settlement Service
// =============================================================================

#[test]
fn test_service_with_loaded_configuration() {
    let config = ConfigLoader::load("./config/vaquitapp").expect("Failed to load config");
    let service = SettlementService::new(create_repository(), &config);

    let result = service.settle_group(&GroupId::new("asado")).unwrap();

    assert_eq!(result.currency, "ARS");
    assert_eq!(transfer_set(&result.transfers), expected_set(&[("b", "a", "30"), ("c", "a", "30")]));
}

#[test]
fn test_service_result_serializes_to_json() {
    let service = SettlementService::with_settings(create_repository(), SettlementConfig::default(), "ARS");

    let result = service.settle_group(&GroupId::new("viaje")).unwrap();
    let json = serde_json::to_string(&result).unwrap();
    let parsed: SettlementResult = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, result);
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(dec(value["balances"]["d"].as_str().unwrap()), dec("70"));
    assert_eq!(value["audit_trace"]["steps"].as_array().unwrap().len(), 2);
}

#[test]
fn test_service_consolidates_across_groups() {
    let service = SettlementService::with_settings(create_repository(), SettlementConfig::default(), "ARS");

    // asado: b -> a 30, c -> a 30
    // viaje: a = -50 + 30 = -20, b = -50, d = +70  =>  b -> d 50, a -> d 20
    let view = service.consolidate_for_member(&id("b")).unwrap();

    assert_eq!(view.entries.len(), 2);
    assert_eq!(view.entries[0].counterparty, id("a"));
    assert_eq!(view.entries[0].direction, Direction::Owes);
    assert_eq!(view.entries[0].total, dec("30"));
    assert_eq!(view.entries[1].counterparty, id("d"));
    assert_eq!(view.entries[1].total, dec("50"));
    assert_eq!(view.entries[1].breakdown[0].group_name, "Viaje a Mendoza");
    assert_eq!(view.total_owing, dec("80"));
    assert_eq!(view.net(), dec("-80"));
}

#[test]
fn test_service_consolidation_for_member_in_both_directions() {
    let service = SettlementService::with_settings(create_repository(), SettlementConfig::default(), "ARS");

    let view = service.consolidate_for_member(&id("a")).unwrap();

    assert_eq!(view.total_owed, dec("60"));
    assert_eq!(view.total_owing, dec("20"));
    assert_eq!(view.owes().count(), 1);
    assert_eq!(view.owed().count(), 2);
    assert_eq!(view.net(), dec("40"));
}

#[test]
fn test_service_marks_completion_without_feedback() {
    let service = SettlementService::with_settings(create_repository(), SettlementConfig::default(), "ARS");
    let asado = GroupId::new("asado");

    let completion = service
        .mark_transfer_completed(&asado, &Transfer::new(id("b"), id("a"), dec("30")))
        .unwrap();

    assert_eq!(completion.amount, dec("30"));
    assert_eq!(service.repository().load_completions(&asado).unwrap(), vec![completion]);

    let result = service.settle_group(&asado).unwrap();
    assert_eq!(result.transfers.len(), 2);
}

#[test]
fn test_service_folds_completions_when_configured() {
    let config = SettlementConfig {
        fold_completed_transfers: true,
        ..SettlementConfig::default()
    };
    let service = SettlementService::with_settings(create_repository(), config, "ARS");
    let asado = GroupId::new("asado");

    service
        .mark_transfer_completed(&asado, &Transfer::new(id("b"), id("a"), dec("30")))
        .unwrap();
    service
        .mark_transfer_completed(&asado, &Transfer::new(id("c"), id("a"), dec("30")))
        .unwrap();

    let result = service.settle_group(&asado).unwrap();
    assert!(result.transfers.is_empty());
    assert!(result.balances.is_settled(service.settlement_config()));
}

#[test]
fn test_service_unknown_group() {
    let service = SettlementService::with_settings(create_repository(), SettlementConfig::default(), "ARS");
    let result = service.settle_group(&GroupId::new("nope"));
    assert!(matches!(result, Err(EngineError::GroupNotFound { .. })));
}
