//! Opaque identifiers for Words and change history items.
//!
//! Ids are uuid-v4 hex strings generated once at creation. They are compared
//! and hashed as plain strings so that ids read back from storage are
//! indistinguishable from freshly generated ones.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn new_uid() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Unique identifier for a Word.
///
/// Immutable once generated; survives renames of the translated-word key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WordId(String);

impl WordId {
    #[must_use]
    pub fn generate() -> Self {
        Self(new_uid())
    }

    /// Wrap an id restored from storage.
    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier for a change history item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeId(String);

impl ChangeId {
    #[must_use]
    pub fn generate() -> Self {
        Self(new_uid())
    }

    #[must_use]
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChangeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
