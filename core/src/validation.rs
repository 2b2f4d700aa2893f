//! Field validation: character sets and notation structure.
//!
//! Validation runs as a two-stage pipeline. The character stage checks that
//! every character of the candidate text belongs to the field's allowed set;
//! the structure stage checks the field-specific grammar. Fields with no
//! registered validator are reported as not applicable rather than pass or
//! fail.
//!
//! The etymological notation encodes a word's phonetic skeleton as groups
//! separated by `|`, with optional `[`/`]` segments and, for combined words,
//! a top-level `+` split into one skeleton per contributing parent. A group
//! is valid iff it is one consonant (or one of the digraphs th/sh/ch) with
//! at most one vowel of padding on each side.

use std::sync::LazyLock;

use regex::Regex;

use lexigraph_types::WordField;

const ETYMOLOGICAL_CHARSET: &str = "abcdefghijklmnopqrstuvwxyzé|[]+ ";
const COMPILED_CHARSET: &str = "abcdefghijklmnopqrstuvwxyzé|";

static SINGLE_CONSONANT_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[aeioué]?[bcdfghjklmnpqrstvwxyz][aeioué]?$")
        .expect("valid single-consonant group regex")
});

static DIGRAPH_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new("^[aeioué]?(th|sh|ch)[aeioué]?$").expect("valid digraph group regex")
});

/// Outcome of one validation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validity {
    Valid,
    Invalid,
    /// No validator is registered for the field.
    NotApplicable,
}

/// Split one skeleton into groups.
///
/// Order matters: split on `|` first, then `][`, `[`, `]`, so bracket
/// markers act as group boundaries even when adjacent to `|`. Pieces are
/// trimmed and empties discarded.
#[must_use]
pub fn split_into_groups(skeleton: &str) -> Vec<&str> {
    let mut pieces = vec![skeleton];
    for delimiter in ["|", "][", "[", "]"] {
        let mut next = Vec::new();
        for piece in pieces {
            next.extend(piece.split(delimiter));
        }
        pieces = next;
    }
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Split a notation on `+` into one skeleton per contributing parent.
#[must_use]
pub fn split_into_elements(notation: &str) -> Vec<&str> {
    notation.split('+').map(str::trim).collect()
}

#[must_use]
pub fn group_is_valid(group: &str) -> bool {
    SINGLE_CONSONANT_GROUP.is_match(group) || DIGRAPH_GROUP.is_match(group)
}

/// True iff every group of every `+`-element is grammatically valid.
#[must_use]
pub fn groups_are_valid(notation: &str) -> bool {
    split_into_elements(notation)
        .into_iter()
        .flat_map(split_into_groups)
        .all(group_is_valid)
}

fn charset_for(field: WordField) -> Option<&'static str> {
    match field {
        WordField::EtymologicalSymbology => Some(ETYMOLOGICAL_CHARSET),
        WordField::CompiledSymbology => Some(COMPILED_CHARSET),
        _ => None,
    }
}

/// Character-set stage: every character of `text` (lowercased) must belong
/// to the field's allowed set.
#[must_use]
pub fn check_characters(field: WordField, text: &str) -> Validity {
    let Some(charset) = charset_for(field) else {
        return Validity::NotApplicable;
    };
    let lowered = text.to_lowercase();
    if lowered.chars().all(|c| charset.contains(c)) {
        Validity::Valid
    } else {
        Validity::Invalid
    }
}

/// Structure stage: field-specific grammar over the whole text.
#[must_use]
pub fn check_structure(field: WordField, text: &str) -> Validity {
    match field {
        WordField::EtymologicalSymbology | WordField::CompiledSymbology => {
            if groups_are_valid(&text.to_lowercase()) {
                Validity::Valid
            } else {
                Validity::Invalid
            }
        }
        _ => Validity::NotApplicable,
    }
}

/// The full pipeline: characters, then structure. The first stage that does
/// not pass decides the outcome.
#[must_use]
pub fn validate_for_field(field: WordField, text: &str) -> Validity {
    match check_characters(field, text) {
        Validity::Valid => check_structure(field, text),
        other => other,
    }
}
