use serde::{Deserialize, Serialize};
use std::fmt;

/// Short stable entry identifier (truncated content hash, hex).
///
/// Generation is deterministic, but the store is the final arbiter of
/// uniqueness; colliding refs are regenerated with a line-number salt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryRef(String);

impl EntryRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for EntryRef {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EntryRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for EntryRef {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
