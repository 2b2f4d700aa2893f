//! Wordflow: the multi-stage audit of a Word's symbolic notation.
//!
//! Stages run in a fixed order over a read-only Word and check that the
//! notation fields agree with each other: the compiled skeleton must flatten
//! the etymological one, the symbol mapping must label every group, the
//! selection may only use defined symbols, and the realized in-language word
//! must be derivable from the selection. A word is "combined" iff it
//! declares translated-word components; that classification gates the
//! component and pattern stages.
//!
//! The pipeline never mutates the Word; it accumulates one tagged outcome
//! per stage for validators and diagnostics.

use std::collections::HashMap;

use lexigraph_types::WordField;

use crate::validation::{self, Validity};
use crate::word::{FieldValue, Word};

/// Admissible (symbol mapping, pattern) combinations for combined words.
///
/// A closed set: extendable here, not user-editable from this layer.
const REGISTERED_SYMBOL_PATTERNS: &[(&str, &str)] = &[
    ("A + B", "AB"),
    ("A + B", "BA"),
    ("A B + C", "ABC"),
    ("A B + C", "AC"),
    ("A + B C", "ABC"),
    ("A + B C", "AC"),
    ("A B + C D", "ABCD"),
    ("A B + C D", "AD"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageStatus {
    Passed,
    Failed,
    /// The stage does not apply to this word's classification.
    NotApplicable,
}

/// One stage result, tagged with the field it concerns.
#[derive(Debug, Clone)]
pub struct StageOutcome {
    pub description: String,
    pub field: WordField,
    pub status: StageStatus,
}

/// Stage pipeline for auditing notation consistency end-to-end.
#[derive(Debug, Default)]
pub struct Wordflow {
    results: Vec<StageOutcome>,
}

impl Wordflow {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run every stage against `word`, returning the accumulated outcomes.
    pub fn run_stages(&mut self, word: &Word) -> &[StageOutcome] {
        let is_combined = !word.translated_word_components().is_empty();

        self.stage_translated_word(word);
        self.stage_translated_components(word, is_combined);
        self.stage_in_language_components(word, is_combined);
        self.stage_etymological_symbology(word);
        self.stage_compiled_symbology(word);
        self.stage_symbol_mapping(word, is_combined);
        self.stage_symbol_selection(word);
        self.stage_symbol_pattern(word, is_combined);
        self.stage_in_language_word(word, is_combined);

        &self.results
    }

    #[must_use]
    pub fn results(&self) -> &[StageOutcome] {
        &self.results
    }

    /// Count of stages that produced a pass or fail verdict.
    #[must_use]
    pub fn count_checks(&self) -> usize {
        self.results
            .iter()
            .filter(|outcome| outcome.status != StageStatus::NotApplicable)
            .count()
    }

    /// Count of failed stages.
    #[must_use]
    pub fn failed_stages(&self) -> usize {
        self.results
            .iter()
            .filter(|outcome| outcome.status == StageStatus::Failed)
            .count()
    }

    /// The fields whose stages failed, in stage order.
    #[must_use]
    pub fn failed_fields(&self) -> Vec<WordField> {
        self.results
            .iter()
            .filter(|outcome| outcome.status == StageStatus::Failed)
            .map(|outcome| outcome.field)
            .collect()
    }

    fn record(&mut self, field: WordField, passed: bool) {
        let verdict = if passed { "validation passed" } else { "validation failed" };
        self.results.push(StageOutcome {
            description: format!("{}: {verdict}", field.label()),
            field,
            status: if passed { StageStatus::Passed } else { StageStatus::Failed },
        });
    }

    fn record_not_applicable(&mut self, field: WordField) {
        self.results.push(StageOutcome {
            description: format!("{}: not applicable for a root word", field.label()),
            field,
            status: StageStatus::NotApplicable,
        });
    }

    fn text_field(word: &Word, field: WordField) -> String {
        match word.find_data_on(field) {
            FieldValue::Text(value) => value,
            _ => String::new(),
        }
    }

    fn list_field(word: &Word, field: WordField) -> Vec<String> {
        match word.find_data_on(field) {
            FieldValue::List(values) => values,
            _ => Vec::new(),
        }
    }

    /// Stage 1: the translated word must be non-empty.
    fn stage_translated_word(&mut self, word: &Word) {
        self.record(
            WordField::TranslatedWord,
            !word.translated_word().is_empty(),
        );
    }

    /// Stage 3 (combined only): every declared component is non-empty.
    fn stage_translated_components(&mut self, word: &Word, is_combined: bool) {
        if !is_combined {
            self.record_not_applicable(WordField::TranslatedComponents);
            return;
        }
        let all_present = word
            .translated_word_components()
            .iter()
            .all(|component| !component.is_empty());
        self.record(WordField::TranslatedComponents, all_present);
    }

    /// Stage 4 (combined only): every in-language spelling is non-empty.
    fn stage_in_language_components(&mut self, word: &Word, is_combined: bool) {
        if !is_combined {
            self.record_not_applicable(WordField::InLanguageComponents);
            return;
        }
        let components = Self::list_field(word, WordField::InLanguageComponents);
        let all_present = components.iter().all(|component| !component.is_empty());
        self.record(WordField::InLanguageComponents, all_present);
    }

    /// Stage 5: character set plus group grammar of the skeleton.
    fn stage_etymological_symbology(&mut self, word: &Word) {
        let notation = Self::text_field(word, WordField::EtymologicalSymbology);
        let passed =
            validation::validate_for_field(WordField::EtymologicalSymbology, &notation)
                == Validity::Valid;
        self.record(WordField::EtymologicalSymbology, passed);
    }

    /// Stage 6: the compiled form must be groups of letters and `|` only,
    /// and its letters must replay the etymological letters in order.
    fn stage_compiled_symbology(&mut self, word: &Word) {
        let compiled = Self::text_field(word, WordField::CompiledSymbology);
        let etymological = Self::text_field(word, WordField::EtymologicalSymbology);

        let grammar_ok = validation::validate_for_field(WordField::CompiledSymbology, &compiled)
            == Validity::Valid;
        let compiled_letters: String = compiled.chars().filter(|c| c.is_alphabetic()).collect();
        let etymological_letters: String = etymological
            .chars()
            .filter(|c| c.is_alphabetic())
            .collect();

        self.record(
            WordField::CompiledSymbology,
            grammar_ok && compiled_letters == etymological_letters,
        );
    }

    /// Stage 7: the mapping must label every group - one token per group for
    /// a root word, element-wise token/group agreement for a combined word.
    fn stage_symbol_mapping(&mut self, word: &Word, is_combined: bool) {
        let mapping = Self::text_field(word, WordField::SymbolMapping);
        let etymological = Self::text_field(word, WordField::EtymologicalSymbology);

        let passed = if is_combined {
            mapping.contains('+') && Self::mapping_elements_agree(&etymological, &mapping)
        } else {
            let group_count = validation::split_into_groups(&etymological).len();
            !mapping.contains('+') && mapping.split_whitespace().count() == group_count
        };
        self.record(WordField::SymbolMapping, passed);
    }

    fn mapping_elements_agree(etymological: &str, mapping: &str) -> bool {
        let skeleton_elements = validation::split_into_elements(etymological);
        let mapping_elements = validation::split_into_elements(mapping);
        if skeleton_elements.len() != mapping_elements.len() {
            return false;
        }
        skeleton_elements
            .iter()
            .zip(&mapping_elements)
            .all(|(skeleton, tokens)| {
                validation::split_into_groups(skeleton).len()
                    == tokens.split_whitespace().count()
            })
    }

    /// Stage 8: only symbols defined in the mapping may be selected.
    fn stage_symbol_selection(&mut self, word: &Word) {
        let mapping = Self::text_field(word, WordField::SymbolMapping);
        let selection = Self::text_field(word, WordField::SymbolSelection);

        let defined: Vec<&str> = mapping
            .split_whitespace()
            .filter(|token| *token != "+")
            .collect();
        let passed = selection
            .split_whitespace()
            .all(|token| defined.contains(&token));
        self.record(WordField::SymbolSelection, passed);
    }

    /// Stage 9 (combined only): the mapping/pattern pair must be registered.
    fn stage_symbol_pattern(&mut self, word: &Word, is_combined: bool) {
        if !is_combined {
            self.record_not_applicable(WordField::SymbolPatternSelected);
            return;
        }
        let mapping = Self::text_field(word, WordField::SymbolMapping);
        let pattern = Self::text_field(word, WordField::SymbolPatternSelected);
        let registered = REGISTERED_SYMBOL_PATTERNS
            .iter()
            .any(|(m, p)| *m == mapping && *p == pattern);
        self.record(WordField::SymbolPatternSelected, registered);
    }

    /// Stage 10: the realized spelling must be derivable from the notation.
    fn stage_in_language_word(&mut self, word: &Word, is_combined: bool) {
        let in_language = Self::text_field(word, WordField::InLanguageWord);
        let etymological = Self::text_field(word, WordField::EtymologicalSymbology);

        let passed = if is_combined {
            let mapping = Self::text_field(word, WordField::SymbolMapping);
            let selection = Self::text_field(word, WordField::SymbolSelection);
            Self::realize_combined(&etymological, &mapping, &selection)
                .is_some_and(|expected| expected == in_language)
        } else {
            in_language == etymological.replace('|', "")
        };
        self.record(WordField::InLanguageWord, passed);
    }

    /// Zip mapping tokens against skeleton groups and fold the selection
    /// through the resulting symbol table. None when counts do not line up.
    fn realize_combined(etymological: &str, mapping: &str, selection: &str) -> Option<String> {
        let skeleton_elements = validation::split_into_elements(etymological);
        let mapping_elements = validation::split_into_elements(mapping);
        if skeleton_elements.len() != mapping_elements.len() {
            return None;
        }

        let mut symbol_table: HashMap<&str, &str> = HashMap::new();
        for (skeleton, tokens) in skeleton_elements.iter().zip(&mapping_elements) {
            let groups: Vec<&str> = skeleton
                .split('|')
                .map(str::trim)
                .filter(|group| !group.is_empty())
                .collect();
            let tokens: Vec<&str> = tokens.split_whitespace().collect();
            if groups.len() != tokens.len() {
                return None;
            }
            for (token, group) in tokens.into_iter().zip(groups) {
                symbol_table.insert(token, group);
            }
        }

        let mut realized = String::new();
        for symbol in selection.split_whitespace() {
            realized.push_str(symbol_table.get(symbol)?);
        }
        Some(realized)
    }
}

#[cfg(test)]
mod tests {
    use lexigraph_types::WordField;

    use super::{StageStatus, Wordflow};
    use crate::word::{FieldValue, Word};

    fn root_word() -> Word {
        let mut word = Word::new();
        word.set_field_to(WordField::TranslatedWord, FieldValue::text("fire"));
        word.set_field_to(
            WordField::EtymologicalSymbology,
            FieldValue::text("|aba|et|"),
        );
        word.set_field_to(WordField::CompiledSymbology, FieldValue::text("|aba|et|"));
        word.set_field_to(WordField::SymbolMapping, FieldValue::text("A B"));
        word.set_field_to(WordField::SymbolSelection, FieldValue::text("A B"));
        word.set_field_to(WordField::InLanguageWord, FieldValue::text("abaet"));
        word
    }

    fn combined_word() -> Word {
        let mut word = Word::new();
        word.set_field_to(WordField::TranslatedWord, FieldValue::text("firewater"));
        word.set_field_to(
            WordField::TranslatedComponents,
            FieldValue::list(["fire", "water"]),
        );
        word.set_field_to(
            WordField::InLanguageComponents,
            FieldValue::list(["abaet", "ib"]),
        );
        word.set_field_to(
            WordField::EtymologicalSymbology,
            FieldValue::text("|aba| + |ib|"),
        );
        word.set_field_to(WordField::CompiledSymbology, FieldValue::text("|aba|ib|"));
        word.set_field_to(WordField::SymbolMapping, FieldValue::text("A + B"));
        word.set_field_to(WordField::SymbolSelection, FieldValue::text("A B"));
        word.set_field_to(WordField::SymbolPatternSelected, FieldValue::text("AB"));
        word.set_field_to(WordField::InLanguageWord, FieldValue::text("abaib"));
        word
    }

    fn failed_fields(word: &Word) -> Vec<WordField> {
        let mut flow = Wordflow::new();
        flow.run_stages(word);
        flow.failed_fields()
    }

    #[test]
    fn test_valid_root_word_passes_every_stage() {
        let word = root_word();
        let mut flow = Wordflow::new();
        flow.run_stages(&word);
        assert_eq!(flow.failed_stages(), 0);
        // Component and pattern stages do not apply to roots.
        assert_eq!(flow.count_checks(), 6);
        assert_eq!(flow.results().len(), 9);
        assert!(
            flow.results()
                .iter()
                .filter(|outcome| outcome.status == StageStatus::NotApplicable)
                .count()
                == 3
        );
    }

    #[test]
    fn test_valid_combined_word_passes_every_stage() {
        let word = combined_word();
        let mut flow = Wordflow::new();
        flow.run_stages(&word);
        assert_eq!(flow.failed_fields(), Vec::<WordField>::new());
        assert_eq!(flow.count_checks(), 9);
    }

    #[test]
    fn test_empty_translated_word_fails_stage_one() {
        let mut word = root_word();
        word.set_field_to(WordField::TranslatedWord, FieldValue::text(""));
        assert!(failed_fields(&word).contains(&WordField::TranslatedWord));
    }

    #[test]
    fn test_invalid_skeleton_fails_etymology_stage() {
        let mut word = root_word();
        word.set_field_to(
            WordField::EtymologicalSymbology,
            FieldValue::text("|bc|"),
        );
        assert!(failed_fields(&word).contains(&WordField::EtymologicalSymbology));
    }

    #[test]
    fn test_compiled_sequence_identity() {
        let mut word = root_word();
        // Same groups, different letters: grammar passes, identity fails.
        word.set_field_to(WordField::CompiledSymbology, FieldValue::text("|aba|er|"));
        let failed = failed_fields(&word);
        assert_eq!(failed, vec![WordField::CompiledSymbology]);
    }

    #[test]
    fn test_compiled_charset_rejects_markers() {
        let mut word = root_word();
        word.set_field_to(WordField::CompiledSymbology, FieldValue::text("|aba|[et]|"));
        assert!(failed_fields(&word).contains(&WordField::CompiledSymbology));
    }

    #[test]
    fn test_root_mapping_must_not_contain_plus() {
        let mut word = root_word();
        word.set_field_to(WordField::SymbolMapping, FieldValue::text("A + B"));
        let failed = failed_fields(&word);
        // The selection stage still finds its tokens among the mapping's.
        assert!(failed.contains(&WordField::SymbolMapping));
    }

    #[test]
    fn test_root_mapping_token_count_must_match_groups() {
        let mut word = root_word();
        word.set_field_to(WordField::SymbolMapping, FieldValue::text("A B C"));
        assert!(failed_fields(&word).contains(&WordField::SymbolMapping));
    }

    #[test]
    fn test_combined_mapping_must_contain_plus() {
        let mut word = combined_word();
        word.set_field_to(WordField::SymbolMapping, FieldValue::text("A B"));
        assert!(failed_fields(&word).contains(&WordField::SymbolMapping));
    }

    #[test]
    fn test_combined_mapping_element_counts() {
        let mut word = combined_word();
        // Two tokens against one group in the first element.
        word.set_field_to(WordField::SymbolMapping, FieldValue::text("A X + B"));
        assert!(failed_fields(&word).contains(&WordField::SymbolMapping));
    }

    #[test]
    fn test_selection_may_only_use_defined_symbols() {
        let mut word = root_word();
        word.set_field_to(WordField::SymbolSelection, FieldValue::text("A Z"));
        assert_eq!(failed_fields(&word), vec![WordField::SymbolSelection]);
    }

    #[test]
    fn test_unregistered_pattern_fails() {
        let mut word = combined_word();
        word.set_field_to(WordField::SymbolPatternSelected, FieldValue::text("ZZ"));
        assert_eq!(
            failed_fields(&word),
            vec![WordField::SymbolPatternSelected]
        );
    }

    #[test]
    fn test_root_realization_strips_delimiters() {
        let mut word = root_word();
        word.set_field_to(WordField::InLanguageWord, FieldValue::text("abaer"));
        assert_eq!(failed_fields(&word), vec![WordField::InLanguageWord]);
    }

    #[test]
    fn test_combined_realization_follows_selection_order() {
        let mut word = combined_word();
        word.set_field_to(WordField::SymbolSelection, FieldValue::text("B A"));
        word.set_field_to(WordField::InLanguageWord, FieldValue::text("ibaba"));
        assert_eq!(failed_fields(&word), Vec::<WordField>::new());
    }

    #[test]
    fn test_combined_realization_fails_on_count_mismatch() {
        let mut word = combined_word();
        word.set_field_to(
            WordField::EtymologicalSymbology,
            FieldValue::text("|aba|et| + |ib|"),
        );
        // Mapping still labels one group per element, so the realization
        // cannot line up and stage 10 fails alongside the mapping stage.
        let failed = failed_fields(&word);
        assert!(failed.contains(&WordField::InLanguageWord));
    }

    #[test]
    fn test_empty_component_fails_exactly_that_stage() {
        let mut word = combined_word();
        word.set_field_to(
            WordField::InLanguageComponents,
            FieldValue::list(["abaet", ""]),
        );
        assert_eq!(
            failed_fields(&word),
            vec![WordField::InLanguageComponents]
        );
    }
}
