//! One-shot lookups for words given on the command line
//!
//! Each word drives its own surface, so the output follows the same state
//! machine as the interactive popup. Words are looked up concurrently.

use std::fmt::Write;

use quickdef::surface::{PopupState, Surface, SurfaceKind};
use quickdef::{Definition, LookupError, LookupHandle, LookupResponse};

/// Result of looking up one command-line word
#[derive(Debug)]
pub struct Outcome {
    pub word: String,
    pub surface: Surface,
    /// Raw channel response, if a request was sent
    pub response: Option<LookupResponse>,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        matches!(self.surface.state(), PopupState::Success(_))
    }

    /// Channel response to print in JSON mode.
    ///
    /// Words rejected before a request was sent get the response the lookup
    /// service gives for invalid words.
    pub fn json_response(&self) -> LookupResponse {
        match &self.response {
            Some(response) => response.clone(),
            None => LookupResponse::err(LookupError::InvalidWord.user_message()),
        }
    }
}

/// Looks up a single word through a fresh surface
pub async fn lookup_word(handle: LookupHandle, word: String, selection: bool) -> Outcome {
    let (mut surface, ticket) = if selection {
        let mut surface = Surface::new(SurfaceKind::ContentScript);
        surface.select(&word, None);
        let ticket = surface.accept_offer();
        (surface, ticket)
    } else {
        let mut surface = Surface::new(SurfaceKind::Toolbar);
        let ticket = surface.search(&word);
        (surface, ticket)
    };

    let response = match ticket {
        Some(ticket) => {
            let response = handle.fetch_definition(ticket.word()).await;
            surface.resolve(&ticket, response.clone());
            Some(response)
        }
        None => None,
    };

    Outcome {
        word,
        surface,
        response,
    }
}

/// Looks up all `words` concurrently, preserving their order
pub async fn lookup_all(handle: &LookupHandle, words: &[String], selection: bool) -> Vec<Outcome> {
    let lookups = words
        .iter()
        .map(|word| lookup_word(handle.clone(), word.clone(), selection));
    futures::future::join_all(lookups).await
}

/// Formats an outcome as plain text
pub fn format_outcome(outcome: &Outcome) -> String {
    match outcome.surface.state() {
        PopupState::Success(definition) => format_definition(definition),
        PopupState::Error(message) => format!("{}: {}\n", outcome.word, message),
        PopupState::Loading { .. } => format!("{}: lookup did not finish\n", outcome.word),
        PopupState::Idle => format!(
            "{}: not a word or short phrase (letters, spaces, hyphens and apostrophes only)\n",
            outcome.word
        ),
    }
}

/// Formats a definition as plain text
pub fn format_definition(definition: &Definition) -> String {
    let mut text = definition.word.clone();
    if !definition.phonetic.is_empty() {
        let _ = write!(text, "  {}", definition.phonetic);
    }
    text.push('\n');

    if !definition.has_meanings() {
        text.push_str("\nNo definitions available\n");
        return text;
    }

    for meaning in &definition.meanings {
        let _ = writeln!(text, "\n{}", meaning.part_of_speech);
        for (i, sense) in meaning.definitions.iter().enumerate() {
            let _ = writeln!(text, "  {}. {}", i + 1, sense.definition);
            if !sense.example.is_empty() {
                let _ = writeln!(text, "     \"{}\"", sense.example);
            }
        }
    }
    text
}
