//! Settlement result models.
//!
//! This module contains the [`SettlementResult`] type and its associated
//! structures that capture all outputs from settling one group, including
//! balances, the transfer plan and an audit trace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Balances, GroupId, Transfer};

/// A single step in the audit trace recording a calculation phase.
///
/// Each step captures the input, output, and reasoning for one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the outcome.
    pub reasoning: String,
}

/// A warning generated during settlement.
///
/// Warnings indicate conditions that don't prevent settlement
/// but may require attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a settlement.
///
/// # Example
///
/// ```
/// use vaquita_settlement::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
///     duration_us: 42,
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during settlement.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

/// The complete result of settling one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementResult {
    /// Unique identifier for this settlement run.
    pub settlement_id: Uuid,
    /// When the settlement was computed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that computed it.
    pub engine_version: String,
    /// The settled group.
    pub group_id: GroupId,
    /// Currency every amount is expressed in.
    pub currency: String,
    /// Net balance per member.
    pub balances: Balances,
    /// Transfers that settle every balance, in emission order.
    pub transfers: Vec<Transfer>,
    /// Complete audit trace of the computation.
    pub audit_trace: AuditTrace,
}
