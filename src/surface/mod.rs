//! Popup surfaces and their presentation state machine
//!
//! Each surface (the in-page popup and the toolbar popup) owns one
//! [`Surface`] that moves through Idle → Loading → Success | Error. Surfaces
//! never share state; they only meet in the definition cache behind the
//! lookup channel.
//!
//! Cancellation is UI-only. Every lookup request hands out a
//! [`LookupTicket`] stamped with the surface's generation; dismissing the
//! popup or starting a newer lookup bumps the generation, so a late answer
//! for an old ticket is dropped instead of rendered.

mod html;
mod recent;

pub use html::{escape_html, render_html};
pub use recent::{placeholder_text, RecentSearch, RECENT_SEARCH_KEY};

use serde::{Deserialize, Serialize};

use crate::channel::LookupResponse;
use crate::data::{validate, Definition, ValidationRules};

/// Shown by the toolbar when the typed input is rejected before lookup
pub const INVALID_INPUT_MESSAGE: &str = "Please enter a valid word (letters only, max 50 characters)";

/// Which popup a surface drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SurfaceKind {
    /// Floating popup next to an in-page selection
    ContentScript,
    /// Popup opened from the toolbar with a search box
    Toolbar,
}

/// Screen-space rectangle of the selection a popup belongs to
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl AnchorRect {
    /// Collapsed rectangles cannot carry a lookup affordance
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Presentation state of a surface
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PopupState {
    /// Nothing visible
    #[default]
    Idle,
    /// A lookup is in flight for `word`
    Loading { word: String },
    /// The lookup produced a definition
    Success(Definition),
    /// The lookup failed; holds the user-facing message
    Error(String),
}

/// Proof of a pending lookup, checked before its result is applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    generation: u64,
    word: String,
}

impl LookupTicket {
    /// The raw word the lookup was requested for
    pub fn word(&self) -> &str {
        &self.word
    }
}

/// A valid selection waiting for the user to ask for its definition
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOffer {
    pub word: String,
    pub anchor: Option<AnchorRect>,
}

/// Messages pushed to the in-page surface by other entry points
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum SurfaceMessage {
    /// Show the definition of `word`, e.g. from the context menu
    ShowDefinition {
        word: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },
}

impl SurfaceMessage {
    /// Message produced by the "Lookup" context-menu entry
    pub fn context_menu(selection_text: &str) -> Self {
        SurfaceMessage::ShowDefinition {
            word: selection_text.trim().to_string(),
            source: Some("contextMenu".to_string()),
        }
    }
}

/// One popup surface and its state machine
#[derive(Debug, Clone)]
pub struct Surface {
    kind: SurfaceKind,
    state: PopupState,
    generation: u64,
    anchor: Option<AnchorRect>,
    offer: Option<SelectionOffer>,
}

impl Surface {
    pub fn new(kind: SurfaceKind) -> Self {
        Self {
            kind,
            state: PopupState::Idle,
            generation: 0,
            anchor: None,
            offer: None,
        }
    }

    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    pub fn state(&self) -> &PopupState {
        &self.state
    }

    /// Anchor of the currently shown popup, if any
    pub fn anchor(&self) -> Option<AnchorRect> {
        self.anchor
    }

    /// Pending "Lookup" offer for the current selection
    pub fn offer(&self) -> Option<&SelectionOffer> {
        self.offer.as_ref()
    }

    pub fn is_visible(&self) -> bool {
        self.state != PopupState::Idle
    }

    /// Whether a result for `ticket` would still be applied
    pub fn is_current(&self, ticket: &LookupTicket) -> bool {
        ticket.generation == self.generation && matches!(self.state, PopupState::Loading { .. })
    }

    /// Enters Loading for `word` and returns the ticket for its result.
    ///
    /// Any earlier ticket becomes stale.
    pub fn request(&mut self, word: &str, anchor: Option<AnchorRect>) -> LookupTicket {
        self.generation += 1;
        self.offer = None;
        self.anchor = anchor;
        self.state = PopupState::Loading {
            word: word.to_string(),
        };
        LookupTicket {
            generation: self.generation,
            word: word.to_string(),
        }
    }

    /// Applies a lookup result.
    ///
    /// Returns `false` and leaves the state untouched if the ticket is stale,
    /// i.e. the popup was dismissed or a newer lookup started meanwhile.
    pub fn resolve(&mut self, ticket: &LookupTicket, response: LookupResponse) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(word = ticket.word(), "discarding stale lookup result");
            return false;
        }

        self.state = match response.into_result() {
            Ok(definition) if self.kind == SurfaceKind::Toolbar && definition.word.is_empty() => {
                PopupState::Error("No definition found".to_string())
            }
            Ok(definition) => PopupState::Success(definition),
            Err(message) => PopupState::Error(message),
        };
        true
    }

    /// Hides the popup and invalidates any pending lookup
    pub fn dismiss(&mut self) {
        self.generation += 1;
        self.state = PopupState::Idle;
        self.anchor = None;
        self.offer = None;
    }

    /// Handles a changed in-page selection.
    ///
    /// A selection passing the selection rules with a non-collapsed anchor
    /// becomes the pending offer. An empty, invalid or collapsed selection
    /// dismisses the popup and any pending lookup.
    pub fn select(&mut self, raw: &str, anchor: Option<AnchorRect>) -> Option<&SelectionOffer> {
        let text = raw.trim();
        let collapsed = anchor.is_some_and(|rect| rect.is_empty());
        if text.is_empty() || collapsed || !validate(text, &ValidationRules::selection()) {
            self.dismiss();
            return None;
        }

        self.offer = Some(SelectionOffer {
            word: text.to_string(),
            anchor,
        });
        self.offer.as_ref()
    }

    /// Starts the lookup for the pending offer, if there is one
    pub fn accept_offer(&mut self) -> Option<LookupTicket> {
        let offer = self.offer.take()?;
        Some(self.request(&offer.word, offer.anchor))
    }

    /// Handles a message from another entry point.
    ///
    /// Context-menu words skip the selection token limit; the lookup service
    /// still validates them.
    pub fn handle_message(&mut self, message: SurfaceMessage) -> Option<LookupTicket> {
        match message {
            SurfaceMessage::ShowDefinition { word, .. } => {
                let word = word.trim();
                if word.is_empty() {
                    self.dismiss();
                    return None;
                }
                let anchor = self.offer.as_ref().and_then(|offer| offer.anchor);
                Some(self.request(word, anchor))
            }
        }
    }

    /// Handles a toolbar search submission.
    ///
    /// Empty input is ignored. Invalid input goes straight to Error without a
    /// lookup.
    pub fn search(&mut self, raw: &str) -> Option<LookupTicket> {
        let word = raw.trim();
        if word.is_empty() {
            return None;
        }

        if !validate(word, &ValidationRules::standard()) {
            self.generation += 1;
            self.state = PopupState::Error(INVALID_INPUT_MESSAGE.to_string());
            return None;
        }

        Some(self.request(word, None))
    }

    /// Renders the current state as HTML, `None` while Idle
    pub fn render_html(&self) -> Option<String> {
        render_html(self.kind, &self.state)
    }
}
