//! Member model and identifier types.
//!
//! The engine itself only needs something that carries an identifier, which
//! is expressed by the [`Participant`] trait. [`Member`] is the rich roster
//! record callers join display data from.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a group member.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Creates an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MemberId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Anything that can take part in a settlement.
///
/// Balance computation only looks at identifiers, so rosters can be passed
/// either as full [`Member`] records or as bare [`MemberId`]s.
pub trait Participant {
    /// The identifier type balances and transfers are keyed by.
    type Id: Clone + Ord + fmt::Display;

    /// Returns the participant's identifier.
    fn id(&self) -> &Self::Id;
}

/// Represents a person belonging to a group.
///
/// # Example
///
/// ```
/// use vaquita_settlement::models::{Member, MemberId, Participant};
///
/// let member = Member::new("ana", "Ana").with_payment_alias("ana.mp");
/// assert_eq!(member.id(), &MemberId::new("ana"));
/// assert_eq!(member.payment_alias.as_deref(), Some("ana.mp"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Unique identifier for the member.
    pub id: MemberId,
    /// Display name.
    pub name: String,
    /// Bank alias, CBU or CVU shown to whoever has to pay this member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_alias: Option<String>,
}

impl Member {
    /// Creates a member without a payment alias.
    pub fn new(id: impl Into<MemberId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            payment_alias: None,
        }
    }

    /// Sets the payment alias.
    pub fn with_payment_alias(mut self, alias: impl Into<String>) -> Self {
        self.payment_alias = Some(alias.into());
        self
    }
}

impl Participant for Member {
    type Id = MemberId;

    fn id(&self) -> &MemberId {
        &self.id
    }
}

impl Participant for MemberId {
    type Id = MemberId;

    fn id(&self) -> &MemberId {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_id_serializes_as_plain_string() {
        let id = MemberId::new("ana");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"ana\"");
    }

    #[test]
    fn test_member_id_ordering_is_lexicographic() {
        let mut ids = vec![MemberId::new("carla"), MemberId::new("ana"), MemberId::new("beto")];
        ids.sort();
        assert_eq!(ids, vec![MemberId::new("ana"), MemberId::new("beto"), MemberId::new("carla")]);
    }

    #[test]
    fn test_deserialize_member_without_alias() {
        let json = r#"{ "id": "beto", "name": "Beto" }"#;

        let member: Member = serde_json::from_str(json).unwrap();
        assert_eq!(member.id.as_str(), "beto");
        assert_eq!(member.name, "Beto");
        assert!(member.payment_alias.is_none());
    }

    #[test]
    fn test_serialize_member_skips_missing_alias() {
        let member = Member::new("carla", "Carla");
        let json = serde_json::to_string(&member).unwrap();
        assert!(!json.contains("payment_alias"));
    }

    #[test]
    fn test_member_and_id_share_participant_id() {
        let member = Member::new("ana", "Ana");
        let id = MemberId::new("ana");
        assert_eq!(Participant::id(&member), Participant::id(&id));
    }
}
