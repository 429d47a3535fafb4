//! Net balances per member.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::SettlementConfig;
use crate::error::{EngineError, EngineResult};

use super::MemberId;

/// Signed net position of every member of a ledger.
///
/// Positive values are owed money, negative values owe money. Entries are
/// ordered by identifier, which is also the tie-break order used when
/// reducing balances to transfers. Values net to zero within one minor
/// unit; balances computed from expenses net to exactly zero.
///
/// Serializes as a plain map. Deserializing goes through
/// [`Balances::from_map`] with the default [`SettlementConfig`], so an
/// unbalanced map is rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Balances<Id: Ord = MemberId> {
    entries: BTreeMap<Id, Decimal>,
}

impl<Id: Ord> Balances<Id> {
    /// Wraps entries already known to net to zero.
    pub(crate) fn from_entries(entries: BTreeMap<Id, Decimal>) -> Self {
        Self { entries }
    }

    /// Builds balances from externally supplied values.
    ///
    /// Values are rounded to the configured precision. A residual of up to
    /// one minor unit is accepted, as left by rounding each balance on its
    /// own. Fails with [`EngineError::UnbalancedLedger`] beyond that.
    ///
    /// # Example
    ///
    /// ```
    /// use vaquita_settlement::config::SettlementConfig;
    /// use vaquita_settlement::models::Balances;
    /// use rust_decimal::Decimal;
    ///
    /// let config = SettlementConfig::default();
    /// let balances = Balances::from_map([("ana", Decimal::new(60, 0)), ("beto", Decimal::new(-60, 0))], &config)?;
    /// assert_eq!(balances.get(&"ana"), Some(Decimal::new(60, 0)));
    ///
    /// let unbalanced = Balances::from_map([("ana", Decimal::ONE)], &config);
    /// assert!(unbalanced.is_err());
    /// # Ok::<(), vaquita_settlement::error::EngineError>(())
    /// ```
    pub fn from_map<I>(values: I, config: &SettlementConfig) -> EngineResult<Self>
    where
        I: IntoIterator<Item = (Id, Decimal)>,
    {
        let entries: BTreeMap<Id, Decimal> = values
            .into_iter()
            .map(|(id, value)| (id, config.round(value)))
            .collect();

        let total: Decimal = entries.values().copied().sum();
        if total.abs() > config.tolerance() {
            return Err(EngineError::UnbalancedLedger { total });
        }

        Ok(Self { entries })
    }

    /// Returns the balance of a member, if present.
    pub fn get(&self, id: &Id) -> Option<Decimal> {
        self.entries.get(id).copied()
    }

    /// Iterates balances in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&Id, Decimal)> {
        self.entries.iter().map(|(id, value)| (id, *value))
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no members.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of every balance. At most one minor unit away from zero.
    pub fn total(&self) -> Decimal {
        self.entries.values().copied().sum()
    }

    /// Returns true if every member is within tolerance of zero.
    pub fn is_settled(&self, config: &SettlementConfig) -> bool {
        self.entries.values().all(|value| config.is_negligible(*value))
    }

    /// Returns the underlying map.
    pub fn as_map(&self) -> &BTreeMap<Id, Decimal> {
        &self.entries
    }

    pub(crate) fn get_mut(&mut self, id: &Id) -> Option<&mut Decimal> {
        self.entries.get_mut(id)
    }

    /// Consumes the balances, returning the underlying map.
    pub fn into_inner(self) -> BTreeMap<Id, Decimal> {
        self.entries
    }
}

impl<Id: Ord + Serialize> Serialize for Balances<Id> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

impl<'de, Id> Deserialize<'de> for Balances<Id>
where
    Id: Ord + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = BTreeMap::<Id, Decimal>::deserialize(deserializer)?;
        Self::from_map(entries, &SettlementConfig::default()).map_err(serde::de::Error::custom)
    }
}
