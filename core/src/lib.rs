//! Lexicon graph, change propagation, and notation grammar.
//!
//! The core of an invented-language workbench: Words are either root forms
//! or combinations of other registered Words, each field mutation is
//! recorded as a change history item, and edits to an ancestor ripple an
//! unresolved-change marker through every transitive descendant. The
//! `Wordflow` pipeline audits a Word's symbolic notation for internal
//! grammatical consistency, independent of persistence or graph state.
//!
//! There is no ambient state here: callers pass the `Lexicon` and its
//! `LexiconChangeHistory` explicitly, and persistence goes through the
//! narrow storage contract in `lexigraph-storage`.

mod change_history;
mod lexicon;
mod validation;
mod word;
mod wordflow;

pub use change_history::{ChangeHistoryItem, LexiconChangeHistory};
pub use lexicon::{EditOutcome, Lexicon, ROOT_BUCKET};
pub use validation::{Validity, validate_for_field};
pub use word::{FieldValue, SetOutcome, Word};
pub use wordflow::{StageOutcome, StageStatus, Wordflow};
