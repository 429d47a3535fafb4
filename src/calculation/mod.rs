//! Calculation logic for the settlement engine.
//!
//! This module contains the pure settlement computations: equal splitting
//! of expenses, net balance computation, greedy reduction of balances to
//! transfers, application of transfers to balances, and consolidation of
//! per-group plans for a single member.

mod balance_computation;
mod consolidation;
mod transfer_reduction;

pub use balance_computation::{compute_balances, equal_share};
pub use consolidation::consolidate_for_member;
pub use transfer_reduction::{apply_transfers, reduce_to_transfers};
