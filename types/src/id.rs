//! Identifier newtypes for monitored transactions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Chain-native transaction hash, kept as the chain reports it.
///
/// The monitor treats the hash as opaque: it is the lookup key for records
/// and the argument passed to chain clients, never parsed or normalized.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TxId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Name of the chain a transaction lives on, as configured at startup.
///
/// Matching against the configured client registry is exact and
/// case-sensitive.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainName(String);

impl ChainName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ChainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChainName {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
