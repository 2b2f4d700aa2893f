//! In-memory implementation of the storage contract (for testing).

use std::collections::HashMap;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::{Record, StorageService};

/// Keeps record sets in a plain map. Useful anywhere a test needs the
/// storage contract without touching the filesystem.
#[derive(Debug, Default)]
pub struct MemoryStore {
    sets: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.sets.contains_key(name)
    }
}

impl StorageService for MemoryStore {
    fn read(&self, name: &str) -> Result<String> {
        self.sets
            .get(name)
            .cloned()
            .with_context(|| format!("No record set stored under {name}"))
    }

    fn store(&mut self, name: &str, content: &str) -> Result<()> {
        self.sets.insert(name.to_string(), content.to_string());
        Ok(())
    }

    fn serialise_record(&self, record: &Record) -> Result<String> {
        serde_json::to_string(record).context("Failed to serialise record")
    }

    fn deserialise_record(&self, line: &str) -> Result<Record> {
        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("Failed to deserialise record line: {line}"))?;
        match value {
            Value::Object(map) => Ok(map),
            other => anyhow::bail!("record line is not an object: {other}"),
        }
    }
}
