//! JSON-on-disk implementation of the storage contract.
//!
//! Writes use a temp file + rename pattern so a crash mid-save never leaves
//! a half-written record set behind.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::{Record, StorageService};

/// Stores each record set as a file of newline-delimited JSON objects
/// under a single data directory.
#[derive(Debug)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create data directory {}", root.display()))?;
        Ok(Self { root })
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(format!("{name}.dat"))
    }

    fn atomic_write(path: &Path, content: &str) -> Result<()> {
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in {}", parent.display()))?;
        tmp.write_all(content.as_bytes())
            .context("Failed to write record set to temp file")?;
        tmp.as_file().sync_all().context("Failed to sync temp file")?;
        tmp.persist(path)
            .with_context(|| format!("Failed to persist record set to {}", path.display()))?;
        Ok(())
    }
}

impl StorageService for JsonFileStore {
    fn read(&self, name: &str) -> Result<String> {
        let path = self.path_for(name);
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read record set {}", path.display()))
    }

    fn store(&mut self, name: &str, content: &str) -> Result<()> {
        let path = self.path_for(name);
        Self::atomic_write(&path, content)?;
        debug!(name, bytes = content.len(), "stored record set");
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
