//! The Word entity: a versioned, keyed bag of typed fields.
//!
//! A Word knows how to mutate one of its own fields and record the change,
//! and how to classify the changes in its version history as unresolved
//! own-edits or unresolved ancestor-edits. It knows nothing about the
//! lexicon graph or the change repository beyond the read-only lookup it is
//! handed; registering produced change items is the caller's job.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use lexigraph_storage::Record;
use lexigraph_types::{ChangeId, LexiconError, WordField, WordId};

use crate::change_history::{ChangeHistoryItem, LexiconChangeHistory};

/// A value read from or written to one Word field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Flag(bool),
    Ids(Vec<ChangeId>),
}

impl FieldValue {
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    #[must_use]
    pub fn list<T: Into<String>>(values: impl IntoIterator<Item = T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(value) => f.write_str(value),
            Self::List(values) => write!(f, "[{}]", values.join(", ")),
            Self::Flag(value) => write!(f, "{value}"),
            Self::Ids(ids) => {
                let joined = ids
                    .iter()
                    .map(ChangeId::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "[{joined}]")
            }
        }
    }
}

/// Result of one attempted field mutation.
///
/// Distinguishes the three ways a set can leave the Word untouched, so the
/// caller never has to diff before/after state to find out what happened.
#[derive(Debug, Clone, PartialEq)]
pub enum SetOutcome {
    /// The field changed; the produced item must be registered by the caller.
    Changed(ChangeHistoryItem),
    /// The new value equals the current value.
    AlreadyEqual,
    /// The field is protected from direct external mutation.
    Protected,
    /// The value's shape does not fit the field.
    Rejected,
}

impl SetOutcome {
    #[must_use]
    pub fn into_change(self) -> Option<ChangeHistoryItem> {
        match self {
            Self::Changed(item) => Some(item),
            _ => None,
        }
    }
}

fn placeholder_key() -> String {
    WordId::generate().to_string()
}

/// Persistent snapshot of a Word. The transient unresolved-change state is
/// recomputed after load, not stored.
#[derive(Debug, Serialize, Deserialize)]
struct WordRecord {
    #[serde(default = "WordId::generate")]
    uid: WordId,
    #[serde(default = "placeholder_key")]
    translated_word: String,
    #[serde(default)]
    translated_word_components: Vec<String>,
    #[serde(default)]
    in_language_components: Vec<String>,
    #[serde(default)]
    etymological_symbology: String,
    #[serde(default)]
    compiled_symbology: String,
    #[serde(default)]
    symbol_mapping: String,
    #[serde(default)]
    symbol_selection: String,
    #[serde(default)]
    symbol_pattern_selected: String,
    #[serde(default)]
    rules_applied: String,
    #[serde(default)]
    in_language_word: String,
    #[serde(default)]
    is_related_to: String,
    #[serde(default)]
    version_history: Vec<ChangeId>,
    #[serde(default)]
    resolved_history_items: Vec<ChangeId>,
}

/// One vocabulary entry. The `translated_word` is the lookup key within a
/// Lexicon; `uid` is the stable identity changes are attributed to.
#[derive(Debug, Clone)]
pub struct Word {
    uid: WordId,
    translated_word: String,
    translated_word_components: Vec<String>,
    in_language_components: Vec<String>,
    etymological_symbology: String,
    compiled_symbology: String,
    symbol_mapping: String,
    symbol_selection: String,
    symbol_pattern_selected: String,
    rules_applied: String,
    in_language_word: String,
    is_related_to: String,
    version_history: Vec<ChangeId>,
    resolved_history_items: Vec<ChangeId>,

    // Transient, recomputed by identify_unresolved_modifications.
    unresolved_changes_to_self: Vec<ChangeId>,
    unresolved_changes_to_ancestor: Vec<ChangeId>,
    // Stored flag for the fixed-point sweep propagation mode.
    ancestor_flag: bool,
}

impl Default for Word {
    fn default() -> Self {
        Self::new()
    }
}

impl Word {
    /// Blank Word under an auto-generated placeholder key.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(WordRecord {
            uid: WordId::generate(),
            translated_word: placeholder_key(),
            translated_word_components: Vec::new(),
            in_language_components: Vec::new(),
            etymological_symbology: String::new(),
            compiled_symbology: String::new(),
            symbol_mapping: String::new(),
            symbol_selection: String::new(),
            symbol_pattern_selected: String::new(),
            rules_applied: String::new(),
            in_language_word: String::new(),
            is_related_to: String::new(),
            version_history: Vec::new(),
            resolved_history_items: Vec::new(),
        })
    }

    fn from_parts(record: WordRecord) -> Self {
        let WordRecord {
            uid,
            translated_word,
            translated_word_components,
            in_language_components,
            etymological_symbology,
            compiled_symbology,
            symbol_mapping,
            symbol_selection,
            symbol_pattern_selected,
            rules_applied,
            in_language_word,
            is_related_to,
            version_history,
            resolved_history_items,
        } = record;

        Self {
            uid,
            translated_word,
            translated_word_components,
            in_language_components,
            etymological_symbology,
            compiled_symbology,
            symbol_mapping,
            symbol_selection,
            symbol_pattern_selected,
            rules_applied,
            in_language_word,
            is_related_to,
            version_history,
            resolved_history_items,
            unresolved_changes_to_self: Vec::new(),
            unresolved_changes_to_ancestor: Vec::new(),
            ancestor_flag: false,
        }
    }

    fn to_parts(&self) -> WordRecord {
        WordRecord {
            uid: self.uid.clone(),
            translated_word: self.translated_word.clone(),
            translated_word_components: self.translated_word_components.clone(),
            in_language_components: self.in_language_components.clone(),
            etymological_symbology: self.etymological_symbology.clone(),
            compiled_symbology: self.compiled_symbology.clone(),
            symbol_mapping: self.symbol_mapping.clone(),
            symbol_selection: self.symbol_selection.clone(),
            symbol_pattern_selected: self.symbol_pattern_selected.clone(),
            rules_applied: self.rules_applied.clone(),
            in_language_word: self.in_language_word.clone(),
            is_related_to: self.is_related_to.clone(),
            version_history: self.version_history.clone(),
            resolved_history_items: self.resolved_history_items.clone(),
        }
    }

    /// Reconstruct a Word from a stored record; missing fields fall back to
    /// blank defaults, undecodable content fails.
    pub fn from_record(record: Record) -> Result<Self, LexiconError> {
        let value = Value::Object(record);
        let parts: WordRecord = serde_json::from_value(value)
            .map_err(|err| LexiconError::MalformedRecord(err.to_string()))?;
        Ok(Self::from_parts(parts))
    }

    /// Field-labeled snapshot for persistence.
    #[must_use]
    pub fn data_for_export(&self) -> Record {
        match serde_json::to_value(self.to_parts()) {
            Ok(Value::Object(map)) => map,
            _ => unreachable!("WordRecord serialises to an object"),
        }
    }

    #[must_use]
    pub fn uid(&self) -> &WordId {
        &self.uid
    }

    #[must_use]
    pub fn translated_word(&self) -> &str {
        &self.translated_word
    }

    #[must_use]
    pub fn translated_word_components(&self) -> &[String] {
        &self.translated_word_components
    }

    #[must_use]
    pub fn version_history(&self) -> &[ChangeId] {
        &self.version_history
    }

    /// True iff the version history holds an unresolved change originated by
    /// this word itself.
    #[must_use]
    pub fn has_unresolved_modification(&self) -> bool {
        !self.unresolved_changes_to_self.is_empty()
    }

    /// True iff an ancestor's unresolved change has reached this word,
    /// through either propagation mode.
    #[must_use]
    pub fn has_modified_ancestor(&self) -> bool {
        self.ancestor_flag || !self.unresolved_changes_to_ancestor.is_empty()
    }

    #[must_use]
    pub fn has_resolved_change_with_id(&self, change_id: &ChangeId) -> bool {
        self.resolved_history_items.contains(change_id)
    }

    /// Record `change_id` as acknowledged. Does not retroactively remove it
    /// from the version history.
    pub fn resolve_change_with_id(&mut self, change_id: ChangeId) {
        if !self.resolved_history_items.contains(&change_id) {
            self.resolved_history_items.push(change_id);
        }
    }

    /// File an ancestor's change id into this word's own version history so
    /// it participates in the next unresolved-modification pass.
    pub fn acknowledge_ancestor_modification_of(&mut self, ancestor_change_id: ChangeId) {
        self.version_history.push(ancestor_change_id);
    }

    /// Fixed-point sweep mode: accept the ancestor-modified flag computed by
    /// the lexicon.
    pub fn acknowledge_ancestor_modification_status_of(&mut self, status: bool) {
        self.ancestor_flag = status;
    }

    /// Recompute the unresolved-change sets by walking the version history
    /// against the repository.
    ///
    /// Changes absent from `history` are not yet resolvable and are skipped,
    /// not treated as errors.
    pub fn identify_unresolved_modifications(&mut self, history: &LexiconChangeHistory) {
        self.unresolved_changes_to_self.clear();
        self.unresolved_changes_to_ancestor.clear();
        tracing::debug!(word = %self.translated_word, "determining unresolved changes");
        for change_id in &self.version_history {
            if self.resolved_history_items.contains(change_id) {
                tracing::debug!(%change_id, "already resolved");
                continue;
            }
            match history.find_item_with_id(change_id) {
                None => tracing::debug!(%change_id, "change item not found yet"),
                Some(item) if item.originator() == &self.uid => {
                    tracing::debug!(%change_id, word = %self.translated_word, "unresolved own change");
                    self.unresolved_changes_to_self.push(change_id.clone());
                }
                Some(_) => {
                    tracing::debug!(%change_id, word = %self.translated_word, "unresolved ancestral change");
                    self.unresolved_changes_to_ancestor.push(change_id.clone());
                }
            }
        }
    }

    /// Current value of any field, including the derived and protected ones.
    #[must_use]
    pub fn find_data_on(&self, field: WordField) -> FieldValue {
        match field {
            WordField::TranslatedWord => FieldValue::Text(self.translated_word.clone()),
            WordField::TranslatedComponents => {
                FieldValue::List(self.translated_word_components.clone())
            }
            WordField::InLanguageComponents => {
                FieldValue::List(self.in_language_components.clone())
            }
            WordField::EtymologicalSymbology => {
                FieldValue::Text(self.etymological_symbology.clone())
            }
            WordField::CompiledSymbology => FieldValue::Text(self.compiled_symbology.clone()),
            WordField::SymbolMapping => FieldValue::Text(self.symbol_mapping.clone()),
            WordField::SymbolSelection => FieldValue::Text(self.symbol_selection.clone()),
            WordField::SymbolPatternSelected => {
                FieldValue::Text(self.symbol_pattern_selected.clone())
            }
            WordField::RulesApplied => FieldValue::Text(self.rules_applied.clone()),
            WordField::InLanguageWord => FieldValue::Text(self.in_language_word.clone()),
            WordField::IsRelatedTo => FieldValue::Text(self.is_related_to.clone()),
            WordField::VersionHistory => FieldValue::Ids(self.version_history.clone()),
            WordField::ResolvedHistoryItems => {
                FieldValue::Ids(self.resolved_history_items.clone())
            }
            WordField::HasUnresolvedModification => {
                FieldValue::Flag(self.has_unresolved_modification())
            }
            WordField::HasModifiedAncestor => FieldValue::Flag(self.has_modified_ancestor()),
            WordField::Uid => FieldValue::Text(self.uid.to_string()),
        }
    }

    /// The mutation protocol: assign `new_value`, append a change item to
    /// the version history, and hand that item back for registration.
    ///
    /// Protected fields, equal values, and ill-shaped values leave the Word
    /// untouched; the outcome says which case applied.
    pub fn set_field_to(&mut self, field: WordField, new_value: FieldValue) -> SetOutcome {
        if field.is_protected() {
            return SetOutcome::Protected;
        }
        let old_value = self.find_data_on(field);
        if old_value == new_value {
            return SetOutcome::AlreadyEqual;
        }

        match (field, &new_value) {
            (WordField::TranslatedWord, FieldValue::Text(value)) => {
                self.translated_word = value.clone();
            }
            (WordField::TranslatedComponents, FieldValue::List(values)) => {
                self.translated_word_components = values.clone();
            }
            (WordField::InLanguageComponents, FieldValue::List(values)) => {
                self.in_language_components = values.clone();
            }
            (WordField::EtymologicalSymbology, FieldValue::Text(value)) => {
                self.etymological_symbology = value.clone();
            }
            (WordField::CompiledSymbology, FieldValue::Text(value)) => {
                self.compiled_symbology = value.clone();
            }
            (WordField::SymbolMapping, FieldValue::Text(value)) => {
                self.symbol_mapping = value.clone();
            }
            (WordField::SymbolSelection, FieldValue::Text(value)) => {
                self.symbol_selection = value.clone();
            }
            (WordField::SymbolPatternSelected, FieldValue::Text(value)) => {
                self.symbol_pattern_selected = value.clone();
            }
            (WordField::RulesApplied, FieldValue::Text(value)) => {
                self.rules_applied = value.clone();
            }
            (WordField::InLanguageWord, FieldValue::Text(value)) => {
                self.in_language_word = value.clone();
            }
            (WordField::IsRelatedTo, FieldValue::Text(value)) => {
                self.is_related_to = value.clone();
            }
            _ => return SetOutcome::Rejected,
        }

        SetOutcome::Changed(self.add_version_history_entry(field, &old_value, &new_value))
    }

    fn add_version_history_entry(
        &mut self,
        field: WordField,
        old_value: &FieldValue,
        new_value: &FieldValue,
    ) -> ChangeHistoryItem {
        let description = format!(
            "{} ON {} FROM {} TO {}",
            field.name(),
            self.translated_word,
            old_value,
            new_value
        );
        let item = ChangeHistoryItem::new(description, self.uid.clone());
        self.version_history.push(item.uid().clone());
        item
    }
}
