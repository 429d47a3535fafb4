//! Configuration loading and management for the settlement engine.
//!
//! This module provides functionality to load ledger configurations from YAML
//! files: ledger metadata plus the precision and rounding parameters the
//! settlement computations run with.
//!
//! # Example
//!
//! ```no_run
//! use vaquita_settlement::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/vaquitapp").unwrap();
//! println!("Loaded ledger: {}", config.ledger().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{LedgerConfig, LedgerMetadata, RoundingMode, SettlementConfig};
