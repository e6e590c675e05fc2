//! # Entity References
//!
//! Callers address records either by storage key or by legacy numeric id
//! and never need to know which scheme a given record uses.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reference to a stored entity
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityRef {
    /// Store-assigned key
    ByKey(String),
    /// Legacy sequential id
    ByLegacyId(i64),
}

impl EntityRef {
    /// Parse a textual reference.
    ///
    /// Canonical integers become legacy ids. Other text stays a key with its
    /// exact spelling, though integer-like text such as `"007"` still falls
    /// back to a legacy id lookup (see [`EntityRef::legacy_id`]).
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim();
        match text.parse::<i64>() {
            Ok(id) if id.to_string() == text => EntityRef::ByLegacyId(id),
            _ => EntityRef::ByKey(text.to_string()),
        }
    }

    /// Text to try as a storage key. Every reference is tried as a key first.
    pub fn key(&self) -> String {
        match self {
            EntityRef::ByKey(key) => key.clone(),
            EntityRef::ByLegacyId(id) => id.to_string(),
        }
    }

    /// Legacy id to fall back to when the key lookup misses: any reference
    /// whose text parses as an integer
    pub fn legacy_id(&self) -> Option<i64> {
        match self {
            EntityRef::ByKey(key) => key.parse().ok(),
            EntityRef::ByLegacyId(id) => Some(*id),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, EntityRef::ByKey(key) if key.is_empty())
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityRef::ByKey(key) => write!(f, "{}", key),
            EntityRef::ByLegacyId(id) => write!(f, "#{}", id),
        }
    }
}

impl FromStr for EntityRef {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(EntityRef::parse(s))
    }
}

impl From<&str> for EntityRef {
    fn from(raw: &str) -> Self {
        EntityRef::parse(raw)
    }
}

impl From<String> for EntityRef {
    fn from(raw: String) -> Self {
        EntityRef::parse(&raw)
    }
}

impl From<&String> for EntityRef {
    fn from(raw: &String) -> Self {
        EntityRef::parse(raw)
    }
}

impl From<i64> for EntityRef {
    fn from(id: i64) -> Self {
        EntityRef::ByLegacyId(id)
    }
}
