//! Group model.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Member, MemberId, Transfer};

/// Opaque identifier of a group.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(String);

impl GroupId {
    /// Creates an identifier from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A group of members sharing a ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier for the group.
    pub id: GroupId,
    /// Display name of the group.
    pub name: String,
    /// The roster.
    pub members: Vec<Member>,
}

impl Group {
    /// Creates a group.
    pub fn new(id: impl Into<GroupId>, name: impl Into<String>, members: Vec<Member>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            members,
        }
    }

    /// Looks up a member by identifier.
    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|member| &member.id == id)
    }

    /// Returns true if the identifier belongs to the roster.
    pub fn contains(&self, id: &MemberId) -> bool {
        self.member(id).is_some()
    }

    /// Returns the display name for an identifier, falling back to the raw id.
    pub fn display_name<'a>(&'a self, id: &'a MemberId) -> &'a str {
        self.member(id).map_or(id.as_str(), |member| member.name.as_str())
    }

    /// Joins roster records onto a transfer.
    ///
    /// Returns `None` if either end is not part of the group. The receiving
    /// member's payment alias is what the payer needs to complete the transfer.
    pub fn resolve_transfer(&self, transfer: &Transfer) -> Option<(&Member, &Member)> {
        Some((self.member(&transfer.from)?, self.member(&transfer.to)?))
    }
}
