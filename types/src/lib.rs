//! Core domain types for Lexigraph.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the
//! application: the opaque id newtypes, the closed field enumeration with
//! its human-readable label surface, and the error taxonomy.

mod errors;
mod fields;
mod ids;

pub use errors::LexiconError;
pub use fields::WordField;
pub use ids::{ChangeId, WordId};
