//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading ledger
//! configurations from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{LedgerConfig, LedgerMetadata, SettlementConfig, SettlementFile};

/// Loads and provides access to ledger configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/vaquitapp/
/// ├── ledger.yaml       # Ledger metadata (name, currency)
/// └── settlement.yaml   # Precision, rounding and completion folding
/// ```
///
/// # Example
///
/// ```no_run
/// use vaquita_settlement::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/vaquitapp")?;
/// println!("Currency: {}", loader.ledger().currency);
/// println!("Tolerance: {}", loader.settlement().tolerance());
/// # Ok::<(), vaquita_settlement::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: LedgerConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - A value is out of range
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<LedgerMetadata>(&path.join("ledger.yaml"))?;
        let settlement = Self::load_yaml::<SettlementFile>(&path.join("settlement.yaml"))?.settlement;
        settlement.validate()?;

        Ok(Self {
            config: LedgerConfig::new(metadata, settlement),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying ledger configuration.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Returns the ledger metadata.
    pub fn ledger(&self) -> &LedgerMetadata {
        self.config.ledger()
    }

    /// Returns the settlement parameters.
    pub fn settlement(&self) -> &SettlementConfig {
        self.config.settlement()
    }
}
