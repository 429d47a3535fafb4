//! Expense model.
//!
//! An expense records one shared cost: who advanced the money and who
//! shares it in equal parts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MemberId;

/// Represents a single shared cost.
///
/// Generic over the identifier type so the same ledger shape serves both
/// roster-backed groups (`MemberId`) and ad-hoc identifiers.
///
/// # Example
///
/// ```
/// use vaquita_settlement::models::{Expense, MemberId};
/// use rust_decimal::Decimal;
///
/// let expense = Expense::new(
///     "exp_001",
///     Decimal::new(9000, 2),
///     MemberId::new("ana"),
///     vec![MemberId::new("ana"), MemberId::new("beto"), MemberId::new("carla")],
/// )
/// .with_description("Carne");
/// assert_eq!(expense.participant_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense<Id = MemberId> {
    /// Unique identifier for the expense.
    pub id: String,
    /// The total amount paid. Must be positive.
    pub amount: Decimal,
    /// The member who advanced the money.
    pub paid_by: Id,
    /// The members sharing the cost equally. Must be non-empty and unique.
    pub split_between: Vec<Id>,
    /// Free-form description (e.g., "Supermercado").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// When the expense was logged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl<Id> Expense<Id> {
    /// Creates an expense without description or timestamp.
    pub fn new(id: impl Into<String>, amount: Decimal, paid_by: Id, split_between: Vec<Id>) -> Self {
        Self {
            id: id.into(),
            amount,
            paid_by,
            split_between,
            description: None,
            created_at: None,
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the creation timestamp.
    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Returns the number of members sharing the cost.
    pub fn participant_count(&self) -> usize {
        self.split_between.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_deserialize_expense_with_string_amount() {
        let json = r#"{
            "id": "exp_001",
            "amount": "90.00",
            "paid_by": "ana",
            "split_between": ["ana", "beto", "carla"]
        }"#;

        let expense: Expense = serde_json::from_str(json).unwrap();
        assert_eq!(expense.amount, Decimal::new(9000, 2));
        assert_eq!(expense.paid_by, MemberId::new("ana"));
        assert_eq!(expense.participant_count(), 3);
        assert!(expense.description.is_none());
        assert!(expense.created_at.is_none());
    }

    #[test]
    fn test_serialize_expense_round_trips_timestamp() {
        let created_at = Utc.with_ymd_and_hms(2025, 3, 8, 21, 30, 0).unwrap();
        let expense = Expense::new(
            "exp_002",
            Decimal::new(5000, 2),
            MemberId::new("beto"),
            vec![MemberId::new("beto"), MemberId::new("carla")],
        )
        .with_description("Vino")
        .with_created_at(created_at);

        let json = serde_json::to_string(&expense).unwrap();
        let deserialized: Expense = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, expense);
    }

    #[test]
    fn test_expense_over_plain_ids() {
        let expense: Expense<u32> = Expense::new("exp_003", Decimal::TEN, 1, vec![1, 2]);
        assert_eq!(expense.paid_by, 1);
        assert_eq!(expense.participant_count(), 2);
    }
}
