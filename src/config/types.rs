//! Configuration types for settlement.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Metadata about the ledger.
///
/// Identifies the deployment and the currency every amount is expressed in.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerMetadata {
    /// Human-readable name of the ledger.
    pub name: String,
    /// ISO 4217 code of the currency amounts are expressed in (e.g., "ARS").
    pub currency: String,
}

/// How amounts are rounded to the configured precision.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundingMode {
    /// Half-way values move away from zero (0.005 becomes 0.01).
    #[default]
    MidpointAwayFromZero,
    /// Half-way values move to the nearest even digit.
    MidpointNearestEven,
}

impl RoundingMode {
    /// Returns the matching `rust_decimal` strategy.
    pub fn strategy(self) -> RoundingStrategy {
        match self {
            RoundingMode::MidpointAwayFromZero => RoundingStrategy::MidpointAwayFromZero,
            RoundingMode::MidpointNearestEven => RoundingStrategy::MidpointNearestEven,
        }
    }
}

fn default_decimal_places() -> u32 {
    SettlementConfig::DEFAULT_DECIMAL_PLACES
}

/// Parameters of the balance and transfer computations.
///
/// # Example
///
/// ```
/// use vaquita_settlement::config::SettlementConfig;
/// use rust_decimal::Decimal;
///
/// let config = SettlementConfig::default();
/// assert_eq!(config.tolerance(), Decimal::new(1, 2));
/// assert_eq!(config.round(Decimal::new(33335, 3)), Decimal::new(3334, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementConfig {
    /// Number of decimal places kept for balances and transfers.
    #[serde(default = "default_decimal_places")]
    pub decimal_places: u32,
    /// Rounding applied when quantizing amounts.
    #[serde(default)]
    pub rounding: RoundingMode,
    /// Whether completed transfers are applied to balances before reduction.
    #[serde(default)]
    pub fold_completed_transfers: bool,
}

impl SettlementConfig {
    /// Cent precision.
    pub const DEFAULT_DECIMAL_PLACES: u32 = 2;

    /// Upper bound accepted for `decimal_places`.
    pub const MAX_DECIMAL_PLACES: u32 = 6;

    /// Returns the smallest representable amount (one minor unit).
    ///
    /// This is the epsilon used for every zero comparison: a balance whose
    /// magnitude is below it is considered settled.
    pub fn tolerance(&self) -> Decimal {
        Decimal::new(1, self.decimal_places.min(Self::MAX_DECIMAL_PLACES))
    }

    /// Rounds a value to the configured precision.
    pub fn round(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(
            self.decimal_places.min(Self::MAX_DECIMAL_PLACES),
            self.rounding.strategy(),
        )
    }

    /// Returns true if the value is indistinguishable from zero.
    pub fn is_negligible(&self, value: Decimal) -> bool {
        value.abs() < self.tolerance()
    }

    /// Checks that every field is within range.
    pub fn validate(&self) -> EngineResult<()> {
        if self.decimal_places > Self::MAX_DECIMAL_PLACES {
            return Err(EngineError::InvalidConfig {
                field: "decimal_places".to_string(),
                message: format!(
                    "{} exceeds the maximum of {}",
                    self.decimal_places,
                    Self::MAX_DECIMAL_PLACES
                ),
            });
        }
        Ok(())
    }
}

impl Default for SettlementConfig {
    fn default() -> Self {
        Self {
            decimal_places: Self::DEFAULT_DECIMAL_PLACES,
            rounding: RoundingMode::default(),
            fold_completed_transfers: false,
        }
    }
}

/// Settlement configuration file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementFile {
    /// The settlement section.
    pub settlement: SettlementConfig,
}

/// The complete ledger configuration loaded from YAML files.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    metadata: LedgerMetadata,
    settlement: SettlementConfig,
}

impl LedgerConfig {
    /// Creates a new LedgerConfig from its component parts.
    pub fn new(metadata: LedgerMetadata, settlement: SettlementConfig) -> Self {
        Self {
            metadata,
            settlement,
        }
    }

    /// Returns the ledger metadata.
    pub fn ledger(&self) -> &LedgerMetadata {
        &self.metadata
    }

    /// Returns the settlement parameters.
    pub fn settlement(&self) -> &SettlementConfig {
        &self.settlement
    }
}
