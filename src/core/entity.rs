use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a legal entity in the ownership graph.
///
/// An entity can represent a client, an account, a holding company,
/// a trust, or any party that can own or be owned. The id is opaque:
/// the engine never interprets its contents, it only compares them.
///
/// # Examples
///
/// ```
/// use ownership_engine::core::entity::EntityId;
///
/// let holdco = EntityId::new("HOLDCO-01");
/// let family = EntityId::new("FAM-TRUST");
/// assert_ne!(holdco, family);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Create a new entity identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this entity id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for EntityId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}
