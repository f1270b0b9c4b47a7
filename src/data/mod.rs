//! Core data models for quickdef
//!
//! This module contains the canonical definition types shared by the cache,
//! the lookup service and every popup surface, plus the validator,
//! normalizer and provider client that produce them.

pub mod normalize;
pub mod provider;
pub mod validate;

pub use normalize::{normalize, NormalizeError};
pub use provider::{DefinitionProvider, DictionaryApiClient, FetchError};
pub use validate::{validate, InvalidWord, ValidationRules, Word};

use serde::{Deserialize, Serialize};

/// Canonical lookup result for a single word
///
/// Instances are already truncated to the presentation limits in
/// [`crate::config`]; nothing downstream trims them again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Definition {
    /// The headword as reported by the provider
    pub word: String,
    /// Pronunciation, empty when the provider has none
    pub phonetic: String,
    /// At most three meanings, in provider order
    pub meanings: Vec<Meaning>,
}

/// One part-of-speech grouping of senses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meaning {
    /// Part of speech, e.g. "noun"
    pub part_of_speech: String,
    /// At most three senses, in provider order
    pub definitions: Vec<Sense>,
}

/// A single sense of a word
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    /// Definition text, empty if the provider omitted it
    pub definition: String,
    /// Usage example, empty if absent
    pub example: String,
}

impl Definition {
    /// Whether there is anything to show beneath the header
    pub fn has_meanings(&self) -> bool {
        !self.meanings.is_empty()
    }
}
