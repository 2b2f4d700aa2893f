//! The closed enumeration of Word fields and their label surface.
//!
//! The presentation layer addresses fields by human-readable label
//! (`"Translated Word"`, `"Symbol Mapping"`, ...). [`WordField::parse_label`]
//! is the single validated boundary between that label surface and the
//! enumeration; everything past it is an exhaustive match.

/// One field of a Word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WordField {
    TranslatedWord,
    TranslatedComponents,
    InLanguageComponents,
    EtymologicalSymbology,
    CompiledSymbology,
    SymbolMapping,
    SymbolSelection,
    SymbolPatternSelected,
    RulesApplied,
    InLanguageWord,
    VersionHistory,
    HasUnresolvedModification,
    HasModifiedAncestor,
    ResolvedHistoryItems,
    IsRelatedTo,
    Uid,
}

impl WordField {
    pub const ALL: [WordField; 16] = [
        WordField::TranslatedWord,
        WordField::TranslatedComponents,
        WordField::InLanguageComponents,
        WordField::EtymologicalSymbology,
        WordField::CompiledSymbology,
        WordField::SymbolMapping,
        WordField::SymbolSelection,
        WordField::SymbolPatternSelected,
        WordField::RulesApplied,
        WordField::InLanguageWord,
        WordField::VersionHistory,
        WordField::HasUnresolvedModification,
        WordField::HasModifiedAncestor,
        WordField::ResolvedHistoryItems,
        WordField::IsRelatedTo,
        WordField::Uid,
    ];

    /// Resolve a human-readable label to a field.
    ///
    /// Only the labels exposed to the presentation layer are accepted;
    /// `resolved_history_items` and `uid` are internal and have no label.
    #[must_use]
    pub fn parse_label(label: &str) -> Option<Self> {
        match label {
            "Translated Word" => Some(Self::TranslatedWord),
            "Translated Word Components" => Some(Self::TranslatedComponents),
            "In Language Components" => Some(Self::InLanguageComponents),
            "Etymological Symbology" => Some(Self::EtymologicalSymbology),
            "Compiled Symbology" => Some(Self::CompiledSymbology),
            "Symbol Mapping" => Some(Self::SymbolMapping),
            "Symbol Selection" => Some(Self::SymbolSelection),
            "Symbol Pattern Selected" => Some(Self::SymbolPatternSelected),
            "Rules Applied" => Some(Self::RulesApplied),
            "In Language Word" => Some(Self::InLanguageWord),
            "Version History" => Some(Self::VersionHistory),
            "Has Been Modified Since Last Resolve" => Some(Self::HasUnresolvedModification),
            "Has Modified Ancestor" => Some(Self::HasModifiedAncestor),
            "Is Related To" => Some(Self::IsRelatedTo),
            _ => None,
        }
    }

    /// The label used in diagnostics and stage descriptions.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::TranslatedWord => "Translated Word",
            Self::TranslatedComponents => "Translated Word Components",
            Self::InLanguageComponents => "In Language Components",
            Self::EtymologicalSymbology => "Etymological Symbology",
            Self::CompiledSymbology => "Compiled Symbology",
            Self::SymbolMapping => "Symbol Mapping",
            Self::SymbolSelection => "Symbol Selection",
            Self::SymbolPatternSelected => "Symbol Pattern Selected",
            Self::RulesApplied => "Rules Applied",
            Self::InLanguageWord => "In Language Word",
            Self::VersionHistory => "Version History",
            Self::HasUnresolvedModification => "Has Been Modified Since Last Resolve",
            Self::HasModifiedAncestor => "Has Modified Ancestor",
            Self::ResolvedHistoryItems => "Resolved History Items",
            Self::IsRelatedTo => "Is Related To",
            Self::Uid => "UId",
        }
    }

    /// Internal snake_case name, used in change descriptions and records.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::TranslatedWord => "translated_word",
            Self::TranslatedComponents => "translated_word_components",
            Self::InLanguageComponents => "in_language_components",
            Self::EtymologicalSymbology => "etymological_symbology",
            Self::CompiledSymbology => "compiled_symbology",
            Self::SymbolMapping => "symbol_mapping",
            Self::SymbolSelection => "symbol_selection",
            Self::SymbolPatternSelected => "symbol_pattern_selected",
            Self::RulesApplied => "rules_applied",
            Self::InLanguageWord => "in_language_word",
            Self::VersionHistory => "version_history",
            Self::HasUnresolvedModification => "has_been_modified_since_last_resolve",
            Self::HasModifiedAncestor => "has_modified_ancestor",
            Self::ResolvedHistoryItems => "resolved_history_items",
            Self::IsRelatedTo => "is_related_to",
            Self::Uid => "uid",
        }
    }

    /// Protected fields change only through the mutation protocol, never
    /// by a direct external set.
    #[must_use]
    pub fn is_protected(self) -> bool {
        matches!(
            self,
            Self::VersionHistory
                | Self::HasUnresolvedModification
                | Self::HasModifiedAncestor
                | Self::ResolvedHistoryItems
                | Self::Uid
        )
    }
}
