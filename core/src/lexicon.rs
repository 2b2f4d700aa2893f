//! The Lexicon: Word repository, parent/child graph, and change propagation.
//!
//! Words reference their parents by translated-word key only; the graph is a
//! derived adjacency index rebuilt deterministically from the member set
//! whenever membership or any word's component declarations change. Dangling
//! parent keys are tolerated by design - an unregistered parent simply has
//! no child list entry resolved against it.
//!
//! Two propagation strategies exist and are not meant to run simultaneously:
//! the eager ripple inside [`Lexicon::set_field_to_value`], which pushes a
//! fresh change id into every transitive descendant, and the older
//! fixed-point boolean sweep ([`Lexicon::resolve_modification_flags`]).

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};

use lexigraph_storage::{Record, StorageService};
use lexigraph_types::{ChangeId, LexiconError, WordField, WordId};

use crate::change_history::LexiconChangeHistory;
use crate::validation::{self, Validity};
use crate::word::{FieldValue, SetOutcome, Word};

const FILE_PREFIX: &str = "LEX";

/// Synthetic relationship bucket for parentless words.
pub const ROOT_BUCKET: &str = "ROOT";

/// Result of one attempted field edit through the lexicon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    /// The change was applied, registered, and rippled to descendants.
    Applied(ChangeId),
    /// The new value equals the current value; nothing was recorded.
    AlreadyEqual,
    /// The field is protected; nothing was recorded.
    Protected,
    /// The value failed validation or did not fit the field's shape.
    Rejected,
}

/// Container for the Words that comprise a language.
#[derive(Debug)]
pub struct Lexicon {
    uuid: WordId,
    title: String,
    members: Vec<Word>,
    index_by_translated_word: HashMap<String, usize>,
    index_by_relationship: HashMap<String, Vec<usize>>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexicon {
    #[must_use]
    pub fn new() -> Self {
        Self {
            uuid: WordId::generate(),
            title: "BlankProjectLexicon".to_string(),
            members: Vec::new(),
            index_by_translated_word: HashMap::new(),
            index_by_relationship: HashMap::new(),
        }
    }

    #[must_use]
    pub fn uuid(&self) -> &WordId {
        &self.uuid
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// All registered Words, in registration order.
    #[must_use]
    pub fn get_all_words(&self) -> &[Word] {
        &self.members
    }

    /// The Word registered under `key`, if any.
    #[must_use]
    pub fn retrieve(&self, key: &str) -> Option<&Word> {
        self.index_by_translated_word
            .get(key)
            .map(|&idx| &self.members[idx])
    }

    /// Create a blank Word, register it, and return its placeholder key.
    pub fn create_entry(&mut self) -> String {
        let word = Word::new();
        let key = word.translated_word().to_string();
        self.add_entry(word);
        key
    }

    /// Register a Word and rebuild both indexes.
    ///
    /// Keys are expected to be unique; an entry whose key is already
    /// registered shadows the earlier word in the lookup index until one of
    /// them is renamed.
    pub fn add_entry(&mut self, entry: Word) {
        self.members.push(entry);
        self.rebuild_indexes();
    }

    /// Both indexes, rebuilt from scratch. O(n) per call, which is fine at
    /// the scale of a hand-edited lexicon.
    fn rebuild_indexes(&mut self) {
        self.index_by_translated_word.clear();
        self.index_by_relationship.clear();
        for (idx, word) in self.members.iter().enumerate() {
            self.index_by_translated_word
                .insert(word.translated_word().to_string(), idx);
        }
        for (idx, word) in self.members.iter().enumerate() {
            let parents = word.translated_word_components();
            if parents.is_empty() {
                self.index_by_relationship
                    .entry(ROOT_BUCKET.to_string())
                    .or_default()
                    .push(idx);
            } else {
                for parent in parents {
                    self.index_by_relationship
                        .entry(parent.clone())
                        .or_default()
                        .push(idx);
                }
            }
        }
    }

    /// The registered Words a given word declares as components. Dangling
    /// keys are omitted, not errors.
    #[must_use]
    pub fn get_parents_of(&self, word: &Word) -> Vec<&Word> {
        word.translated_word_components()
            .iter()
            .filter_map(|key| self.retrieve(key))
            .collect()
    }

    /// Direct children of the word registered under `key`.
    #[must_use]
    pub fn get_children_of(&self, key: &str) -> Vec<&Word> {
        self.index_by_relationship
            .get(key)
            .map(|children| children.iter().map(|&idx| &self.members[idx]).collect())
            .unwrap_or_default()
    }

    /// Keys of every transitive descendant of `key`, depth first.
    ///
    /// A key found on the active walk stack means the component declarations
    /// loop; that is surfaced as an error rather than walked forever. A key
    /// reached twice through different parents (a diamond) is fine and is
    /// visited once.
    pub fn get_descendants_of(&self, key: &str) -> Result<Vec<String>, LexiconError> {
        let mut stack = vec![key.to_string()];
        let mut seen = HashSet::new();
        let mut descendants = Vec::new();
        self.collect_descendants(key, &mut stack, &mut seen, &mut descendants)?;
        Ok(descendants)
    }

    fn collect_descendants(
        &self,
        key: &str,
        stack: &mut Vec<String>,
        seen: &mut HashSet<String>,
        out: &mut Vec<String>,
    ) -> Result<(), LexiconError> {
        for child in self.get_children_of(key) {
            let child_key = child.translated_word().to_string();
            if stack.contains(&child_key) {
                return Err(LexiconError::ComponentCycle(child_key));
            }
            if !seen.insert(child_key.clone()) {
                continue;
            }
            out.push(child_key.clone());
            stack.push(child_key.clone());
            self.collect_descendants(&child_key, stack, seen, out)?;
            stack.pop();
        }
        Ok(())
    }

    fn field_from_label(label: &str) -> Result<WordField, LexiconError> {
        WordField::parse_label(label)
            .ok_or_else(|| LexiconError::UnrecognizedField(label.to_string()))
    }

    fn index_of(&self, key: &str) -> Result<usize, LexiconError> {
        self.index_by_translated_word
            .get(key)
            .copied()
            .ok_or_else(|| LexiconError::UnknownWordKey(key.to_string()))
    }

    /// Current value of a field, addressed by human-readable label.
    pub fn get_field_for_word(&self, label: &str, key: &str) -> Result<FieldValue, LexiconError> {
        let field = Self::field_from_label(label)?;
        let idx = self.index_of(key)?;
        Ok(self.members[idx].find_data_on(field))
    }

    /// Run the character/structure pipeline for a field addressed by label.
    pub fn validate_for_word_field(
        &self,
        label: &str,
        to_validate: &str,
    ) -> Result<Validity, LexiconError> {
        let field = Self::field_from_label(label)?;
        Ok(validation::validate_for_field(field, to_validate))
    }

    /// Edit one field of one Word and propagate the consequences.
    ///
    /// On an applied change: indexes are rebuilt (the edit may have changed
    /// the graph), the change item is registered, the edited word's
    /// unresolved state is recomputed, and the change id is rippled into
    /// every transitive descendant. A rejected or no-op edit touches
    /// nothing: a rename colliding with a registered key and a component
    /// list that would loop the graph are both rejected before anything is
    /// mutated or recorded.
    pub fn set_field_to_value(
        &mut self,
        label: &str,
        key: &str,
        new_value: FieldValue,
        history: &mut LexiconChangeHistory,
    ) -> Result<EditOutcome, LexiconError> {
        let field = Self::field_from_label(label)?;
        let idx = self.index_of(key)?;

        if field == WordField::TranslatedWord
            && let FieldValue::Text(next_key) = &new_value
            && next_key.as_str() != key
            && self.index_by_translated_word.contains_key(next_key)
        {
            tracing::warn!(key, new_key = %next_key, "edit rejected: key already registered");
            return Ok(EditOutcome::Rejected);
        }

        // A word's descendant set is unaffected by editing its own component
        // list, so the current graph answers whether the new parents would
        // close a loop back onto this word.
        if field == WordField::TranslatedComponents
            && let FieldValue::List(parents) = &new_value
        {
            let descendants = self.get_descendants_of(key)?;
            if parents
                .iter()
                .any(|parent| parent.as_str() == key || descendants.contains(parent))
            {
                tracing::warn!(key, "edit rejected: components would form a cycle");
                return Ok(EditOutcome::Rejected);
            }
        }

        if let FieldValue::Text(text) = &new_value
            && validation::validate_for_field(field, text) == Validity::Invalid
        {
            tracing::debug!(label, key, "edit rejected by validation");
            return Ok(EditOutcome::Rejected);
        }

        let outcome = self.members[idx].set_field_to(field, new_value);
        let item = match outcome {
            SetOutcome::Changed(item) => item,
            SetOutcome::AlreadyEqual => return Ok(EditOutcome::AlreadyEqual),
            SetOutcome::Protected => return Ok(EditOutcome::Protected),
            SetOutcome::Rejected => return Ok(EditOutcome::Rejected),
        };
        let change_id = item.uid().clone();

        // Order matters: rebuild before the ripple so the walk sees the
        // edited graph, and register before recomputing unresolved state so
        // the fresh change is findable.
        self.rebuild_indexes();
        history.add_item(item);
        self.members[idx].identify_unresolved_modifications(history);

        let edited_key = self.members[idx].translated_word().to_string();
        for descendant_key in self.get_descendants_of(&edited_key)? {
            let descendant_idx = self.index_of(&descendant_key)?;
            let descendant = &mut self.members[descendant_idx];
            descendant.acknowledge_ancestor_modification_of(change_id.clone());
            descendant.identify_unresolved_modifications(history);
        }

        tracing::debug!(label, key = %edited_key, change = %change_id, "edit applied");
        Ok(EditOutcome::Applied(change_id))
    }

    /// Mark one change resolved on one Word and recompute that Word's
    /// unresolved state. Other words keep the change in their own version
    /// history until they are separately resolved.
    pub fn resolve_change_for(
        &mut self,
        change_id: &ChangeId,
        key: &str,
        history: &LexiconChangeHistory,
    ) -> Result<(), LexiconError> {
        let idx = self.index_of(key)?;
        let word = &mut self.members[idx];
        word.resolve_change_with_id(change_id.clone());
        word.identify_unresolved_modifications(history);
        Ok(())
    }

    /// Recompute every member's unresolved-change state against the
    /// registered history.
    ///
    /// The unresolved sets are transient and not persisted; run this after
    /// loading a stored lexicon/history pair to derive them again.
    pub fn identify_unresolved_modifications(&mut self, history: &LexiconChangeHistory) {
        for word in &mut self.members {
            word.identify_unresolved_modifications(history);
        }
    }

    /// One sweep of the fixed-point propagation mode: recompute every word's
    /// ancestor-modified flag from its direct parents, returning how many
    /// flags actually flipped.
    pub fn resolve_modification_flags_pass(&mut self) -> usize {
        let next: Vec<bool> = self
            .members
            .iter()
            .map(|word| {
                self.get_parents_of(word)
                    .iter()
                    .any(|parent| {
                        parent.has_unresolved_modification() || parent.has_modified_ancestor()
                    })
            })
            .collect();

        let mut flipped = 0;
        for (word, flag) in self.members.iter_mut().zip(next) {
            if word.has_modified_ancestor() != flag {
                flipped += 1;
            }
            word.acknowledge_ancestor_modification_status_of(flag);
        }
        flipped
    }

    /// Sweep until ten consecutive passes produce zero flips.
    ///
    /// With a DAG this stabilises within the depth of the graph; the ten-pass
    /// floor is a safety margin against cyclic declarations. Returns false
    /// if stability is never reached within the pass budget.
    pub fn resolve_modification_flags(&mut self) -> bool {
        const STABLE_PASSES_REQUIRED: usize = 10;
        let max_passes = self.members.len() + 2 * STABLE_PASSES_REQUIRED;

        let mut stable_run = 0;
        for _ in 0..max_passes {
            if self.resolve_modification_flags_pass() == 0 {
                stable_run += 1;
                if stable_run >= STABLE_PASSES_REQUIRED {
                    return true;
                }
            } else {
                stable_run = 0;
            }
        }
        tracing::warn!(
            passes = max_passes,
            "modification flags failed to stabilise"
        );
        false
    }

    /// Snapshot records for persistence. With `keys`, only the named words
    /// are exported; unknown keys are skipped.
    #[must_use]
    pub fn retrieve_export_data_for(&self, keys: Option<&[String]>) -> Vec<Record> {
        match keys {
            Some(keys) => keys
                .iter()
                .filter_map(|key| self.retrieve(key))
                .map(Word::data_for_export)
                .collect(),
            None => self.members.iter().map(Word::data_for_export).collect(),
        }
    }

    /// Serialise every member, one record per line, under `LEX-<name>`.
    pub fn store_to(&self, store: &mut dyn StorageService, name: &str) -> Result<()> {
        let mut lines = Vec::with_capacity(self.members.len());
        for record in self.retrieve_export_data_for(None) {
            lines.push(store.serialise_record(&record)?);
        }
        store
            .store(&format!("{FILE_PREFIX}-{name}"), &lines.join("\n"))
            .with_context(|| format!("Failed to store lexicon {name}"))
    }

    /// Restore members from `LEX-<name>`. Empty lines are discarded; any
    /// line that cannot be decoded fails the whole load.
    pub fn load_from(&mut self, store: &dyn StorageService, name: &str) -> Result<()> {
        let text = store
            .read(&format!("{FILE_PREFIX}-{name}"))
            .with_context(|| format!("Failed to read lexicon {name}"))?;
        let mut loaded = Vec::new();
        for line in text.split('\n').filter(|line| !line.trim().is_empty()) {
            let record = store.deserialise_record(line)?;
            loaded.push(Word::from_record(record)?);
        }
        self.members = loaded;
        self.rebuild_indexes();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use lexigraph_storage::MemoryStore;
    use lexigraph_types::{LexiconError, WordField};

    use super::{EditOutcome, Lexicon, ROOT_BUCKET};
    use crate::change_history::LexiconChangeHistory;
    use crate::word::{FieldValue, Word};

    fn word_with_key(key: &str) -> Word {
        let mut word = Word::new();
        word.set_field_to(WordField::TranslatedWord, FieldValue::text(key));
        word
    }

    fn word_with_parents(key: &str, parents: &[&str]) -> Word {
        let mut word = word_with_key(key);
        word.set_field_to(
            WordField::TranslatedComponents,
            FieldValue::list(parents.iter().copied()),
        );
        word
    }

    /// fire, water, firewater(fire, water), steam(firewater)
    fn small_lexicon() -> Lexicon {
        let mut lexicon = Lexicon::new();
        lexicon.add_entry(word_with_key("fire"));
        lexicon.add_entry(word_with_key("water"));
        lexicon.add_entry(word_with_parents("firewater", &["fire", "water"]));
        lexicon.add_entry(word_with_parents("steam", &["firewater"]));
        lexicon
    }

    #[test]
    fn test_create_entry_registers_a_blank_word() {
        let mut lexicon = Lexicon::new();
        let key = lexicon.create_entry();
        assert!(lexicon.retrieve(&key).is_some());
        assert_eq!(lexicon.get_all_words().len(), 1);
        assert_eq!(lexicon.get_children_of(ROOT_BUCKET).len(), 1);
    }

    #[test]
    fn test_relationship_index() {
        let lexicon = small_lexicon();
        let children: Vec<&str> = lexicon
            .get_children_of("fire")
            .iter()
            .map(|w| w.translated_word())
            .collect();
        assert_eq!(children, vec!["firewater"]);
        assert_eq!(lexicon.get_children_of(ROOT_BUCKET).len(), 2);
        assert!(lexicon.get_children_of("steam").is_empty());
    }

    #[test]
    fn test_dangling_parent_is_tolerated() {
        let mut lexicon = Lexicon::new();
        lexicon.add_entry(word_with_parents("orphan", &["missing"]));
        let word = lexicon.retrieve("orphan").expect("registered");
        assert!(lexicon.get_parents_of(word).is_empty());
        assert_eq!(
            lexicon.get_descendants_of("missing").expect("walk"),
            vec!["orphan".to_string()]
        );
    }

    #[test]
    fn test_descendants_depth_first() {
        let lexicon = small_lexicon();
        assert_eq!(
            lexicon.get_descendants_of("fire").expect("walk"),
            vec!["firewater".to_string(), "steam".to_string()]
        );
        assert!(lexicon.get_descendants_of("steam").expect("walk").is_empty());
    }

    #[test]
    fn test_diamond_is_visited_once() {
        let mut lexicon = Lexicon::new();
        lexicon.add_entry(word_with_key("root"));
        lexicon.add_entry(word_with_parents("left", &["root"]));
        lexicon.add_entry(word_with_parents("right", &["root"]));
        lexicon.add_entry(word_with_parents("join", &["left", "right"]));

        let descendants = lexicon.get_descendants_of("root").expect("walk");
        assert_eq!(descendants.len(), 3);
        assert_eq!(
            descendants.iter().filter(|k| *k == "join").count(),
            1
        );
    }

    #[test]
    fn test_cycle_is_surfaced_not_walked() {
        let mut lexicon = Lexicon::new();
        lexicon.add_entry(word_with_parents("a", &["b"]));
        lexicon.add_entry(word_with_parents("b", &["a"]));
        assert!(matches!(
            lexicon.get_descendants_of("a"),
            Err(LexiconError::ComponentCycle(_))
        ));
    }

    #[test]
    fn test_unknown_label_and_unknown_key_are_distinct() {
        let mut lexicon = small_lexicon();
        let mut history = LexiconChangeHistory::new();
        assert_eq!(
            lexicon.set_field_to_value("Nonsense", "fire", FieldValue::text("x"), &mut history),
            Err(LexiconError::UnrecognizedField("Nonsense".to_string()))
        );
        assert_eq!(
            lexicon.set_field_to_value(
                "Translated Word",
                "lava",
                FieldValue::text("x"),
                &mut history
            ),
            Err(LexiconError::UnknownWordKey("lava".to_string()))
        );
    }

    #[test]
    fn test_edit_registers_change_and_ripples_to_descendants() {
        let mut lexicon = small_lexicon();
        let mut history = LexiconChangeHistory::new();

        let outcome = lexicon
            .set_field_to_value(
                "Etymological Symbology",
                "fire",
                FieldValue::text("|aba|et|"),
                &mut history,
            )
            .expect("edit");
        let EditOutcome::Applied(change_id) = outcome else {
            panic!("expected an applied change, got {outcome:?}");
        };

        assert!(history.find_item_with_id(&change_id).is_some());

        let fire = lexicon.retrieve("fire").expect("fire");
        assert!(fire.has_unresolved_modification());
        assert!(!fire.has_modified_ancestor());

        for key in ["firewater", "steam"] {
            let word = lexicon.retrieve(key).expect(key);
            assert!(word.version_history().contains(&change_id), "{key}");
            assert!(word.has_modified_ancestor(), "{key}");
            assert!(!word.has_unresolved_modification(), "{key}");
        }
        let water = lexicon.retrieve("water").expect("water");
        assert!(!water.has_modified_ancestor());
    }

    #[test]
    fn test_rejected_edit_leaves_everything_untouched() {
        let mut lexicon = small_lexicon();
        let mut history = LexiconChangeHistory::new();

        let outcome = lexicon
            .set_field_to_value(
                "Etymological Symbology",
                "fire",
                FieldValue::text("|bc|"),
                &mut history,
            )
            .expect("edit path");
        assert_eq!(outcome, EditOutcome::Rejected);
        assert!(history.is_empty());

        let fire = lexicon.retrieve("fire").expect("fire");
        assert_eq!(
            fire.find_data_on(WordField::EtymologicalSymbology),
            FieldValue::text("")
        );
        assert!(fire.version_history().is_empty());
        assert!(
            lexicon
                .retrieve("steam")
                .expect("steam")
                .version_history()
                .is_empty()
        );
    }

    #[test]
    fn test_cycle_creating_edit_is_rejected() {
        let mut lexicon = Lexicon::new();
        lexicon.add_entry(word_with_key("a"));
        lexicon.add_entry(word_with_parents("b", &["a"]));
        let mut history = LexiconChangeHistory::new();

        // a -> components [b] would close the loop a <-> b.
        let outcome = lexicon
            .set_field_to_value(
                "Translated Word Components",
                "a",
                FieldValue::list(["b"]),
                &mut history,
            )
            .expect("edit path");
        assert_eq!(outcome, EditOutcome::Rejected);
        assert!(history.is_empty());
        assert!(
            lexicon
                .retrieve("a")
                .expect("a")
                .translated_word_components()
                .is_empty()
        );

        // Self-reference is the degenerate loop.
        let outcome = lexicon
            .set_field_to_value(
                "Translated Word Components",
                "a",
                FieldValue::list(["a"]),
                &mut history,
            )
            .expect("edit path");
        assert_eq!(outcome, EditOutcome::Rejected);
        assert!(history.is_empty());
    }

    #[test]
    fn test_rename_to_existing_key_is_rejected() {
        let mut lexicon = small_lexicon();
        let mut history = LexiconChangeHistory::new();

        let outcome = lexicon
            .set_field_to_value(
                "Translated Word",
                "fire",
                FieldValue::text("water"),
                &mut history,
            )
            .expect("edit path");
        assert_eq!(outcome, EditOutcome::Rejected);
        assert!(history.is_empty());
        assert!(lexicon.retrieve("fire").is_some());
        assert_eq!(
            lexicon
                .retrieve("fire")
                .expect("fire")
                .find_data_on(WordField::TranslatedWord),
            FieldValue::text("fire")
        );
    }

    #[test]
    fn test_protected_edit_reports_protected() {
        let mut lexicon = small_lexicon();
        let mut history = LexiconChangeHistory::new();
        let outcome = lexicon
            .set_field_to_value("Version History", "fire", FieldValue::text("x"), &mut history)
            .expect("edit path");
        assert_eq!(outcome, EditOutcome::Protected);
        assert!(history.is_empty());
    }

    #[test]
    fn test_rename_rekeys_the_indexes() {
        let mut lexicon = small_lexicon();
        let mut history = LexiconChangeHistory::new();

        lexicon
            .set_field_to_value(
                "Translated Word",
                "fire",
                FieldValue::text("flame"),
                &mut history,
            )
            .expect("rename");

        assert!(lexicon.retrieve("fire").is_none());
        assert!(lexicon.retrieve("flame").is_some());
        // The child still declares "fire", which is now dangling.
        let firewater = lexicon.retrieve("firewater").expect("firewater");
        assert_eq!(lexicon.get_parents_of(firewater).len(), 1);
    }

    #[test]
    fn test_resolving_the_edited_word_does_not_touch_descendants() {
        let mut lexicon = small_lexicon();
        let mut history = LexiconChangeHistory::new();

        let outcome = lexicon
            .set_field_to_value(
                "In Language Word",
                "fire",
                FieldValue::text("abaet"),
                &mut history,
            )
            .expect("edit");
        let EditOutcome::Applied(change_id) = outcome else {
            panic!("expected applied");
        };

        lexicon
            .resolve_change_for(&change_id, "fire", &history)
            .expect("resolve");
        assert!(!lexicon.retrieve("fire").expect("fire").has_unresolved_modification());
        assert!(lexicon.retrieve("steam").expect("steam").has_modified_ancestor());

        lexicon
            .resolve_change_for(&change_id, "steam", &history)
            .expect("resolve");
        assert!(!lexicon.retrieve("steam").expect("steam").has_modified_ancestor());
        assert!(lexicon.retrieve("firewater").expect("firewater").has_modified_ancestor());
    }

    #[test]
    fn test_flag_sweep_reaches_a_fixed_point() {
        let mut lexicon = small_lexicon();
        let mut history = LexiconChangeHistory::new();

        lexicon
            .set_field_to_value(
                "Is Related To",
                "fire",
                FieldValue::text("heat"),
                &mut history,
            )
            .expect("edit");

        assert!(lexicon.resolve_modification_flags());
        assert!(lexicon.retrieve("firewater").expect("firewater").has_modified_ancestor());
        assert!(lexicon.retrieve("steam").expect("steam").has_modified_ancestor());
        assert!(!lexicon.retrieve("water").expect("water").has_modified_ancestor());

        // A stable graph keeps producing zero flips.
        assert_eq!(lexicon.resolve_modification_flags_pass(), 0);
        assert_eq!(lexicon.resolve_modification_flags_pass(), 0);
    }

    #[test]
    fn test_store_then_load_round_trip() {
        let mut store = MemoryStore::new();
        let mut lexicon = small_lexicon();
        let mut history = LexiconChangeHistory::new();
        lexicon
            .set_field_to_value(
                "Etymological Symbology",
                "fire",
                FieldValue::text("|aba|et|"),
                &mut history,
            )
            .expect("edit");

        lexicon.store_to(&mut store, "proj").expect("store");

        let mut restored = Lexicon::new();
        restored.load_from(&store, "proj").expect("load");

        assert_eq!(
            restored.retrieve_export_data_for(None),
            lexicon.retrieve_export_data_for(None)
        );
        let fire = restored.retrieve("fire").expect("fire");
        assert_eq!(fire.version_history().len(), 1);
        // Unresolved state is transient and recomputed on demand.
        assert!(!fire.has_unresolved_modification());
    }

    #[test]
    fn test_loaded_lexicon_recomputes_unresolved_state() {
        let mut store = MemoryStore::new();
        let mut lexicon = small_lexicon();
        let mut history = LexiconChangeHistory::new();
        lexicon
            .set_field_to_value(
                "In Language Word",
                "fire",
                FieldValue::text("abaet"),
                &mut history,
            )
            .expect("edit");

        lexicon.store_to(&mut store, "proj").expect("store lexicon");
        history.store_to(&mut store, "proj").expect("store history");

        let mut restored = Lexicon::new();
        restored.load_from(&store, "proj").expect("load lexicon");
        let mut restored_history = LexiconChangeHistory::new();
        restored_history.load_from(&store, "proj").expect("load history");

        // Freshly loaded words have empty transient state until the sweep.
        assert!(!restored.retrieve("fire").expect("fire").has_unresolved_modification());

        restored.identify_unresolved_modifications(&restored_history);
        assert!(restored.retrieve("fire").expect("fire").has_unresolved_modification());
        assert!(restored.retrieve("firewater").expect("firewater").has_modified_ancestor());
        assert!(restored.retrieve("steam").expect("steam").has_modified_ancestor());
        assert!(!restored.retrieve("water").expect("water").has_modified_ancestor());
    }

    #[test]
    fn test_export_subset_by_key() {
        let lexicon = small_lexicon();
        let keys = vec!["fire".to_string(), "unknown".to_string()];
        let records = lexicon.retrieve_export_data_for(Some(&keys));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["translated_word"], "fire");
    }
}
