//! Core data models for the settlement engine.
//!
//! This module contains all the domain models used throughout the engine.

mod balances;
mod consolidation;
mod expense;
mod group;
mod member;
mod settlement_result;
mod transfer;

pub use balances::Balances;
pub use consolidation::{ConsolidatedView, CounterpartyTotal, Direction, GroupShare, GroupTransfers};
pub use expense::Expense;
pub use group::{Group, GroupId};
pub use member::{Member, MemberId, Participant};
pub use settlement_result::{AuditStep, AuditTrace, AuditWarning, SettlementResult};
pub use transfer::{Transfer, TransferCompletion};
