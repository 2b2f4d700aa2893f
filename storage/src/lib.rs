//! Storage collaborator for the lexicon core.
//!
//! The core persists entities as field-labeled records, one serialized
//! record per line. This crate owns the narrow read/write contract the core
//! calls through: raw named-text access plus record (de)serialization. The
//! core never touches the filesystem directly.

mod json_store;
mod memory_store;

pub use json_store::JsonFileStore;
pub use memory_store::MemoryStore;

use anyhow::Result;

/// A field-labeled snapshot of one entity, ready for persistence.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Narrow persistence contract consumed by the lexicon core.
///
/// `name` is a logical record-set name (e.g. `LEX-mylexicon`), not a path;
/// implementations decide where and how the content lives.
pub trait StorageService {
    /// Full text previously stored under `name`.
    fn read(&self, name: &str) -> Result<String>;

    /// Store `content` under `name`, replacing any previous content.
    fn store(&mut self, name: &str, content: &str) -> Result<()>;

    /// One record as a single line of text.
    fn serialise_record(&self, record: &Record) -> Result<String>;

    /// Decode one line of text back into a record.
    fn deserialise_record(&self, line: &str) -> Result<Record>;
}
