//! Settlement service.
//!
//! Ties a [`LedgerRepository`] to the pure calculations: loads a group's
//! ledger, runs the engine, assembles an audit trace and records transfer
//! completions. Every run is logged with a settlement id for correlation.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::calculation::{apply_transfers, compute_balances, consolidate_for_member, reduce_to_transfers};
use crate::config::{ConfigLoader, SettlementConfig};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditTrace, AuditWarning, ConsolidatedView, Group, GroupId, GroupTransfers, MemberId,
    SettlementResult, Transfer, TransferCompletion,
};
use crate::repository::LedgerRepository;

/// Settles groups stored in a ledger repository.
///
/// # Example
///
/// ```
/// use vaquita_settlement::config::SettlementConfig;
/// use vaquita_settlement::models::{Expense, Group, GroupId, Member, MemberId};
/// use vaquita_settlement::repository::InMemoryLedgerRepository;
/// use vaquita_settlement::service::SettlementService;
/// use rust_decimal::Decimal;
///
/// let repository = InMemoryLedgerRepository::new();
/// repository.insert_group(Group::new(
///     "asado",
///     "Asado",
///     vec![Member::new("ana", "Ana"), Member::new("beto", "Beto")],
/// ))?;
/// repository.add_expense(
///     &GroupId::new("asado"),
///     Expense::new("e1", Decimal::from(50), MemberId::new("ana"), vec![MemberId::new("ana"), MemberId::new("beto")]),
/// )?;
///
/// let service = SettlementService::with_settings(repository, SettlementConfig::default(), "ARS");
/// let result = service.settle_group(&GroupId::new("asado"))?;
/// assert_eq!(result.transfers.len(), 1);
/// assert_eq!(result.transfers[0].amount, Decimal::from(25));
/// # Ok::<(), vaquita_settlement::error::EngineError>(())
/// ```
#[derive(Debug)]
pub struct SettlementService<R> {
    repository: R,
    config: SettlementConfig,
    currency: String,
}

impl<R: LedgerRepository> SettlementService<R> {
    /// Creates a service using a loaded configuration.
    pub fn new(repository: R, config: &ConfigLoader) -> Self {
        Self::with_settings(
            repository,
            config.settlement().clone(),
            config.ledger().currency.clone(),
        )
    }

    /// Creates a service from explicit settings.
    pub fn with_settings(repository: R, config: SettlementConfig, currency: impl Into<String>) -> Self {
        Self {
            repository,
            config,
            currency: currency.into(),
        }
    }

    /// Returns the settlement parameters in use.
    pub fn settlement_config(&self) -> &SettlementConfig {
        &self.config
    }

    /// Returns the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Computes balances and a transfer plan for one group.
    ///
    /// Completed transfers are folded into the balances only when
    /// `fold_completed_transfers` is enabled; otherwise their presence is
    /// reported as a warning in the audit trace.
    ///
    /// # Errors
    ///
    /// Propagates repository failures and any validation error raised by
    /// [`compute_balances`] or [`apply_transfers`].
    pub fn settle_group(&self, group_id: &GroupId) -> EngineResult<SettlementResult> {
        let group = self.repository.load_group(group_id)?;
        self.settle_loaded(&group)
    }

    fn settle_loaded(&self, group: &Group) -> EngineResult<SettlementResult> {
        let settlement_id = Uuid::new_v4();
        let start_time = Instant::now();
        info!(
            settlement_id = %settlement_id,
            group_id = %group.id,
            members = group.members.len(),
            "Settling group"
        );

        let expenses = self.repository.load_expenses(&group.id)?;
        let completions = self.repository.load_completions(&group.id)?;

        let mut steps: Vec<AuditStep> = Vec::new();
        let mut warnings: Vec<AuditWarning> = Vec::new();

        let balances = compute_balances(&expenses, &group.members, &self.config).inspect_err(|err| {
            warn!(
                settlement_id = %settlement_id,
                group_id = %group.id,
                error = %err,
                "Balance computation failed"
            );
        })?;

        let total_spent: Decimal = expenses.iter().map(|expense| self.config.round(expense.amount)).sum();
        steps.push(AuditStep {
            step_number: 1,
            rule_id: "compute_balances".to_string(),
            rule_name: "Balance Computation".to_string(),
            input: serde_json::json!({
                "expense_count": expenses.len(),
                "member_count": group.members.len(),
                "total_spent": total_spent.to_string()
            }),
            output: serde_json::json!({ "balances": &balances }),
            reasoning: format!(
                "{} expense(s) totalling {} {} split across {} member(s)",
                expenses.len(),
                total_spent,
                self.currency,
                group.members.len()
            ),
        });

        if expenses.is_empty() {
            warnings.push(AuditWarning {
                code: "EMPTY_LEDGER".to_string(),
                message: format!("Group '{}' has no expenses", group.id),
                severity: "low".to_string(),
            });
        }

        let balances = if self.config.fold_completed_transfers && !completions.is_empty() {
            let paid: Vec<Transfer> = completions.iter().map(TransferCompletion::as_transfer).collect();
            let folded = apply_transfers(&balances, &paid)?;
            steps.push(AuditStep {
                step_number: 2,
                rule_id: "fold_completed_transfers".to_string(),
                rule_name: "Completed Transfer Folding".to_string(),
                input: serde_json::json!({ "completed_transfers": &paid }),
                output: serde_json::json!({ "balances": &folded }),
                reasoning: format!("Applied {} completed transfer(s) as payments", paid.len()),
            });
            folded
        } else {
            if !completions.is_empty() {
                warnings.push(AuditWarning {
                    code: "COMPLETIONS_NOT_APPLIED".to_string(),
                    message: format!(
                        "{} completed transfer(s) recorded but not applied to balances",
                        completions.len()
                    ),
                    severity: "low".to_string(),
                });
            }
            balances
        };

        let debtors = balances.iter().filter(|(_, value)| *value < Decimal::ZERO).count();
        let creditors = balances.iter().filter(|(_, value)| *value > Decimal::ZERO).count();
        let transfers = reduce_to_transfers(&balances, &self.config);
        steps.push(AuditStep {
            step_number: u32::try_from(steps.len() + 1).unwrap_or(u32::MAX),
            rule_id: "reduce_to_transfers".to_string(),
            rule_name: "Greedy Debt Settlement".to_string(),
            input: serde_json::json!({
                "debtors": debtors,
                "creditors": creditors,
                "tolerance": self.config.tolerance().to_string()
            }),
            output: serde_json::json!({ "transfers": &transfers }),
            reasoning: format!(
                "Largest debtor paid largest creditor until settled: {} transfer(s) for {} debtor(s) and {} creditor(s)",
                transfers.len(),
                debtors,
                creditors
            ),
        });

        let duration_us = u64::try_from(start_time.elapsed().as_micros()).unwrap_or(u64::MAX);
        info!(
            settlement_id = %settlement_id,
            group_id = %group.id,
            expenses = expenses.len(),
            transfers = transfers.len(),
            duration_us,
            "Settlement completed"
        );

        Ok(SettlementResult {
            settlement_id,
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            group_id: group.id.clone(),
            currency: self.currency.clone(),
            balances,
            transfers,
            audit_trace: AuditTrace {
                steps,
                warnings,
                duration_us,
            },
        })
    }

    /// Builds a member's consolidated position across all their groups.
    ///
    /// Each group is settled on its own and the resulting transfers are
    /// summed per counterparty; see [`consolidate_for_member`].
    pub fn consolidate_for_member(&self, member_id: &MemberId) -> EngineResult<ConsolidatedView> {
        let group_ids = self.repository.groups_for_member(member_id)?;
        let mut plans = Vec::with_capacity(group_ids.len());

        for group_id in &group_ids {
            let group = self.repository.load_group(group_id)?;
            let result = self.settle_loaded(&group)?;
            plans.push(GroupTransfers {
                group_id: group.id,
                group_name: group.name,
                transfers: result.transfers,
            });
        }

        let view = consolidate_for_member(member_id, &plans);
        debug!(
            member_id = %member_id,
            groups = plans.len(),
            total_owing = %view.total_owing,
            total_owed = %view.total_owed,
            "Consolidated member position"
        );
        Ok(view)
    }

    /// Records that a transfer was paid.
    ///
    /// The amount is rounded to the configured precision. Both ends must
    /// belong to the group, must differ, and the amount must be positive.
    pub fn mark_transfer_completed(&self, group_id: &GroupId, transfer: &Transfer) -> EngineResult<TransferCompletion> {
        let group = self.repository.load_group(group_id)?;

        for (member_id, role) in [(&transfer.from, "sender"), (&transfer.to, "recipient")] {
            if !group.contains(member_id) {
                return Err(EngineError::InvalidReference {
                    context: format!("Transfer {} -> {}", transfer.from, transfer.to),
                    member_id: member_id.to_string(),
                    role: role.to_string(),
                });
            }
        }

        if transfer.from == transfer.to {
            return Err(EngineError::InvalidTransfer {
                from: transfer.from.to_string(),
                to: transfer.to.to_string(),
                message: "sender and recipient must differ".to_string(),
            });
        }

        let amount = self.config.round(transfer.amount);
        if amount <= Decimal::ZERO {
            return Err(EngineError::InvalidTransfer {
                from: transfer.from.to_string(),
                to: transfer.to.to_string(),
                message: format!("amount must be positive, got {}", transfer.amount),
            });
        }

        let completion = TransferCompletion::new(
            group.id.clone(),
            &Transfer::new(transfer.from.clone(), transfer.to.clone(), amount),
        );
        self.repository.save_completion(completion.clone())?;

        info!(
            group_id = %group.id,
            completion_id = %completion.id,
            from = %completion.from,
            to = %completion.to,
            amount = %completion.amount,
            "Transfer marked as completed"
        );
        Ok(completion)
    }
}
