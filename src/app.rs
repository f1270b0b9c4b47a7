//! Interactive toolbar popup state
//!
//! Holds the search box, the toolbar [`Surface`] and the plumbing that
//! carries lookup responses from background tasks back into the UI loop.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use quickdef::surface::{placeholder_text, LookupTicket, PopupState, RecentSearch, Surface, SurfaceKind};
use quickdef::{LookupHandle, LookupResponse};

/// Main application struct for the interactive popup
pub struct App {
    /// Current contents of the search box
    pub input: String,
    /// Placeholder shown while the search box is empty
    pub placeholder: String,
    /// Toolbar popup state machine
    pub surface: Surface,
    /// Flag to show help overlay
    pub show_help: bool,
    /// Scroll offset for the result pane
    pub scroll_offset: u16,
    /// Flag indicating the application should quit
    pub should_quit: bool,
    handle: LookupHandle,
    recent: RecentSearch,
    results_tx: mpsc::UnboundedSender<(LookupTicket, LookupResponse)>,
    results_rx: mpsc::UnboundedReceiver<(LookupTicket, LookupResponse)>,
}

impl App {
    pub fn new(handle: LookupHandle, recent: RecentSearch) -> Self {
        let (results_tx, results_rx) = mpsc::unbounded_channel();
        Self {
            input: String::new(),
            placeholder: placeholder_text(None),
            surface: Surface::new(SurfaceKind::Toolbar),
            show_help: false,
            scroll_offset: 0,
            should_quit: false,
            handle,
            recent,
            results_tx,
            results_rx,
        }
    }

    /// Loads the recent search into the placeholder
    pub async fn load_recent(&mut self) {
        let recent = self.recent.load().await;
        self.placeholder = placeholder_text(recent.as_deref());
    }

    /// Handles keyboard input and updates state accordingly
    ///
    /// # Key Bindings
    /// - `Enter`: Look up the typed word
    /// - `Esc`: Close the result, or quit when nothing is shown
    /// - `Ctrl+C`: Quit
    /// - `Up`/`Down`: Scroll the result
    /// - `F1` (or `?` on an empty search box): Toggle help
    pub fn handle_key(&mut self, key_event: KeyEvent) {
        if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        // Help overlay intercepts all keys when shown
        if self.show_help {
            if matches!(key_event.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                self.show_help = false;
            }
            return;
        }

        match key_event.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => {
                if self.surface.is_visible() {
                    self.surface.dismiss();
                    self.scroll_offset = 0;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::F(1) => self.show_help = true,
            KeyCode::Char('?') if self.input.is_empty() => self.show_help = true,
            KeyCode::Up => self.scroll_offset = self.scroll_offset.saturating_sub(1),
            KeyCode::Down => self.scroll_offset = self.scroll_offset.saturating_add(1),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    /// Whether Enter would do anything
    pub fn can_search(&self) -> bool {
        !self.input.trim().is_empty()
    }

    /// Starts a lookup for the search box contents
    fn submit(&mut self) {
        self.scroll_offset = 0;
        let Some(ticket) = self.surface.search(&self.input) else {
            return;
        };

        let handle = self.handle.clone();
        let results_tx = self.results_tx.clone();
        tokio::spawn(async move {
            let response = handle.fetch_definition(ticket.word()).await;
            // The app may already have shut down
            let _ = results_tx.send((ticket, response));
        });
    }

    /// Applies every lookup response that has arrived since the last call
    pub async fn drain_results(&mut self) {
        while let Ok((ticket, response)) = self.results_rx.try_recv() {
            self.apply_result(&ticket, response).await;
        }
    }

    /// Waits for the next lookup response and applies it
    #[cfg(test)]
    pub async fn next_result(&mut self) {
        if let Some((ticket, response)) = self.results_rx.recv().await {
            self.apply_result(&ticket, response).await;
        }
    }

    async fn apply_result(&mut self, ticket: &LookupTicket, response: LookupResponse) {
        if !self.surface.resolve(ticket, response) {
            return;
        }
        if matches!(self.surface.state(), PopupState::Success(_)) {
            self.recent.save(ticket.word()).await;
            self.placeholder = placeholder_text(Some(ticket.word()));
        }
    }
}
