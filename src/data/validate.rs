//! Input validation for lookup candidates
//!
//! Both entry points share one validator. The in-page selection path adds a
//! token-count limit through [`ValidationRules::selection`] so whole
//! sentences are not offered as words.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{MAX_SELECTION_TOKENS, MAX_WORD_LEN};

/// Constraints applied on top of the character-set check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    /// Inputs of this many characters or more are rejected
    pub max_len: usize,
    /// Maximum number of whitespace-separated tokens, if limited
    pub max_tokens: Option<usize>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::standard()
    }
}

impl ValidationRules {
    /// Rules for typed searches and context-menu lookups
    pub const fn standard() -> Self {
        Self {
            max_len: MAX_WORD_LEN,
            max_tokens: None,
        }
    }

    /// Rules for in-page text selections
    pub const fn selection() -> Self {
        Self {
            max_len: MAX_WORD_LEN,
            max_tokens: Some(MAX_SELECTION_TOKENS),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c.is_whitespace() || c == '-' || c == '\''
}

/// Returns whether `raw` is a well-formed lookup candidate under `rules`.
///
/// Fails when the trimmed input is empty, has `rules.max_len` characters or
/// more, contains anything outside letters, whitespace, hyphens and
/// apostrophes, or spans more tokens than `rules.max_tokens`.
pub fn validate(raw: &str, rules: &ValidationRules) -> bool {
    let trimmed = raw.trim();

    if trimmed.is_empty() || trimmed.chars().count() >= rules.max_len {
        return false;
    }

    if !trimmed.chars().all(is_word_char) {
        return false;
    }

    match rules.max_tokens {
        Some(max) => trimmed.split_whitespace().count() <= max,
        None => true,
    }
}

/// Returned when a stored string is not a valid lookup key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not a valid word: {0:?}")]
pub struct InvalidWord(pub String);

/// A validated, normalized lookup key (trimmed and lower-cased).
///
/// Deserializing runs the standard validator again, so keys read back from
/// storage are held to the same rules as fresh input.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Word(String);

impl Word {
    /// Validates `raw` and normalizes it into a key.
    ///
    /// Returns `None` when [`validate`] rejects the input.
    pub fn parse(raw: &str, rules: &ValidationRules) -> Option<Self> {
        if !validate(raw, rules) {
            return None;
        }
        Some(Self(raw.trim().to_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Word {
    type Error = InvalidWord;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Word::parse(&raw, &ValidationRules::standard()).ok_or(InvalidWord(raw))
    }
}

impl From<Word> for String {
    fn from(word: Word) -> Self {
        word.0
    }
}

impl AsRef<str> for Word {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
