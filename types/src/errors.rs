//! Error taxonomy for the lexicon core.
//!
//! Rejected values are not errors: a mutation that fails validation is
//! reported through the set outcome, not through this type. These variants
//! cover the structural failures that must be surfaced to the caller.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexiconError {
    /// A field label outside the known label surface.
    #[error("field label '{0}' is not recognised as a member of Word")]
    UnrecognizedField(String),

    /// A translated-word lookup key with no registered Word.
    #[error("no word is registered under the key '{0}'")]
    UnknownWordKey(String),

    /// Component declarations loop back on themselves.
    #[error("component declarations form a cycle through '{0}'")]
    ComponentCycle(String),

    /// A stored line could not be decoded into an entity.
    #[error("malformed stored record: {0}")]
    MalformedRecord(String),
}
