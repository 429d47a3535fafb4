//! Settlement engine for Vaquitapp shared-expense groups
//!
//! This crate computes each member's net balance from a ledger of shared
//! expenses and reduces those balances to a short list of transfers that
//! settles every debt. Storage is reached only through the
//! [`repository::LedgerRepository`] trait.

#![warn(missing_docs)]

pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;
