//! Change history items and their append-only repository.
//!
//! Every successful field mutation produces a [`ChangeHistoryItem`]; the
//! [`LexiconChangeHistory`] keeps all of them for a lexicon, indexed by id
//! and by originating Word. Items are immutable except for their
//! description.

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::Utc;
use serde_json::json;

use lexigraph_storage::{Record, StorageService};
use lexigraph_types::{ChangeId, LexiconError, WordId};

const FILE_PREFIX: &str = "CHI";

/// Audit record of one field mutation on one Word.
///
/// Identity is the `uid`: two items are the same item iff their uids match,
/// regardless of description edits.
#[derive(Debug, Clone)]
pub struct ChangeHistoryItem {
    uid: ChangeId,
    description: String,
    created_utc: i64,
    originator: WordId,
}

impl PartialEq for ChangeHistoryItem {
    fn eq(&self, other: &Self) -> bool {
        self.uid == other.uid
    }
}

impl Eq for ChangeHistoryItem {}

impl ChangeHistoryItem {
    /// New item with a fresh uid and the current timestamp.
    #[must_use]
    pub fn new(description: impl Into<String>, originator: WordId) -> Self {
        Self {
            uid: ChangeId::generate(),
            description: description.into(),
            created_utc: Utc::now().timestamp(),
            originator,
        }
    }

    #[must_use]
    pub fn uid(&self) -> &ChangeId {
        &self.uid
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn created_utc(&self) -> i64 {
        self.created_utc
    }

    #[must_use]
    pub fn originator(&self) -> &WordId {
        &self.originator
    }

    /// The description is the only mutable part of an item.
    pub fn set_description_to(&mut self, new_description: impl Into<String>) {
        self.description = new_description.into();
    }

    /// Field-labeled snapshot for persistence.
    #[must_use]
    pub fn data_for_export(&self) -> Record {
        let mut record = Record::new();
        record.insert("UId".to_string(), json!(self.uid.as_str()));
        record.insert(
            "DescriptionOfChange".to_string(),
            json!(self.description),
        );
        record.insert("CreationTimeUTC".to_string(), json!(self.created_utc));
        record.insert("Originator".to_string(), json!(self.originator.as_str()));
        record
    }

    /// Reconstruct an item from a stored record (the constructor override
    /// path: uid and timestamp come from the record, not freshly generated).
    pub fn from_record(record: &Record) -> Result<Self, LexiconError> {
        let text_field = |label: &str| -> Result<String, LexiconError> {
            record
                .get(label)
                .and_then(|v| v.as_str())
                .map(ToString::to_string)
                .ok_or_else(|| {
                    LexiconError::MalformedRecord(format!("missing or non-text field {label}"))
                })
        };
        let created_utc = record
            .get("CreationTimeUTC")
            .and_then(|value| value.as_i64())
            .ok_or_else(|| {
                LexiconError::MalformedRecord("missing or non-integer CreationTimeUTC".to_string())
            })?;

        Ok(Self {
            uid: ChangeId::from_raw(text_field("UId")?),
            description: text_field("DescriptionOfChange")?,
            created_utc,
            originator: WordId::from_raw(text_field("Originator")?),
        })
    }
}

/// Append-only repository of change history items for one lexicon.
#[derive(Debug, Default)]
pub struct LexiconChangeHistory {
    items: Vec<ChangeHistoryItem>,
    id_index: HashMap<ChangeId, usize>,
    originator_index: HashMap<WordId, Vec<ChangeId>>,
}

impl LexiconChangeHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an item. A no-op if an item with the same uid is already
    /// registered.
    pub fn add_item(&mut self, item: ChangeHistoryItem) {
        if self.id_index.contains_key(item.uid()) {
            tracing::debug!(uid = %item.uid(), "change item already registered, skipping");
            return;
        }
        self.items.push(item);
        self.rebuild_indexes();
    }

    #[must_use]
    pub fn find_item_with_id(&self, id: &ChangeId) -> Option<&ChangeHistoryItem> {
        self.id_index.get(id).map(|&idx| &self.items[idx])
    }

    /// Ids of every change originated by the given Word, oldest first.
    #[must_use]
    pub fn find_items_with_originator(&self, originator: &WordId) -> Option<&[ChangeId]> {
        self.originator_index
            .get(originator)
            .map(Vec::as_slice)
    }

    #[must_use]
    pub fn get_all_items(&self) -> &[ChangeHistoryItem] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Snapshot records for persistence. With `subset`, only the named
    /// changes are exported; unknown ids are skipped.
    #[must_use]
    pub fn retrieve_export_data_for(&self, subset: Option<&[ChangeId]>) -> Vec<Record> {
        match subset {
            Some(ids) => ids
                .iter()
                .filter_map(|id| self.find_item_with_id(id))
                .map(ChangeHistoryItem::data_for_export)
                .collect(),
            None => self
                .items
                .iter()
                .map(ChangeHistoryItem::data_for_export)
                .collect(),
        }
    }

    /// Serialise every item, one record per line, under `CHI-<name>`.
    pub fn store_to(&self, store: &mut dyn StorageService, name: &str) -> Result<()> {
        let mut lines = Vec::with_capacity(self.items.len());
        for record in self.retrieve_export_data_for(None) {
            lines.push(store.serialise_record(&record)?);
        }
        store
            .store(&format!("{FILE_PREFIX}-{name}"), &lines.join("\n"))
            .with_context(|| format!("Failed to store change history {name}"))
    }

    /// Restore items from `CHI-<name>`. Empty lines are discarded; any line
    /// that cannot be decoded fails the whole load.
    pub fn load_from(&mut self, store: &dyn StorageService, name: &str) -> Result<()> {
        let text = store
            .read(&format!("{FILE_PREFIX}-{name}"))
            .with_context(|| format!("Failed to read change history {name}"))?;
        let mut loaded = Vec::new();
        for line in text.split('\n').filter(|line| !line.trim().is_empty()) {
            let record = store.deserialise_record(line)?;
            loaded.push(ChangeHistoryItem::from_record(&record)?);
        }
        self.items = loaded;
        self.rebuild_indexes();
        Ok(())
    }

    fn rebuild_indexes(&mut self) {
        self.id_index.clear();
        self.originator_index.clear();
        for (idx, item) in self.items.iter().enumerate() {
            self.id_index.insert(item.uid().clone(), idx);
            self.originator_index
                .entry(item.originator().clone())
                .or_default()
                .push(item.uid().clone());
        }
    }
}
