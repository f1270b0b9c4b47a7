//! HTML markup for popup surfaces
//!
//! Every provider or error string is escaped before it is placed in markup.

use std::fmt::Write;

use super::{PopupState, SurfaceKind};
use crate::data::Definition;

/// Escapes text for use inside HTML element content or attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Renders `state` for a surface of `kind`, `None` while Idle
pub fn render_html(kind: SurfaceKind, state: &PopupState) -> Option<String> {
    let html = match (kind, state) {
        (_, PopupState::Idle) => return None,
        (SurfaceKind::ContentScript, PopupState::Loading { .. }) => format!(
            "{CLOSE_BUTTON}<div class=\"word-lookup-popup-loading\">Loading definition...</div>"
        ),
        (SurfaceKind::ContentScript, PopupState::Error(message)) => format!(
            "{CLOSE_BUTTON}<div class=\"word-lookup-popup-error\">{}</div>",
            escape_html(message)
        ),
        (SurfaceKind::ContentScript, PopupState::Success(definition)) => {
            content_definition(definition)
        }
        (SurfaceKind::Toolbar, PopupState::Loading { .. }) => {
            "<div class=\"loading\">Searching for definition...</div>".to_string()
        }
        (SurfaceKind::Toolbar, PopupState::Error(message)) => {
            format!("<div class=\"error\">{}</div>", escape_html(message))
        }
        (SurfaceKind::Toolbar, PopupState::Success(definition)) => toolbar_definition(definition),
    };
    Some(html)
}

const CLOSE_BUTTON: &str = "<button class=\"word-lookup-popup-close\">&times;</button>";

fn content_definition(definition: &Definition) -> String {
    let mut html = String::new();
    html.push_str(CLOSE_BUTTON);
    let _ = write!(
        html,
        "<div class=\"word-lookup-popup-header\"><h3 class=\"word-lookup-popup-word\">{}</h3>",
        escape_html(&definition.word)
    );
    if !definition.phonetic.is_empty() {
        let _ = write!(
            html,
            "<div class=\"word-lookup-popup-phonetic\">{}</div>",
            escape_html(&definition.phonetic)
        );
    }
    html.push_str("</div>");

    if !definition.has_meanings() {
        html.push_str("<div class=\"word-lookup-popup-error\">No definitions found</div>");
        return html;
    }

    for meaning in &definition.meanings {
        let _ = write!(
            html,
            "<div class=\"word-lookup-popup-meaning\"><div class=\"word-lookup-popup-pos\">{}</div>",
            escape_html(&meaning.part_of_speech)
        );
        for sense in &meaning.definitions {
            let _ = write!(
                html,
                "<div class=\"word-lookup-popup-definition\"><div class=\"word-lookup-popup-def-text\">{}</div>",
                escape_html(&sense.definition)
            );
            if !sense.example.is_empty() {
                let _ = write!(
                    html,
                    "<div class=\"word-lookup-popup-example\">{}</div>",
                    escape_html(&sense.example)
                );
            }
            html.push_str("</div>");
        }
        html.push_str("</div>");
    }
    html
}

fn toolbar_definition(definition: &Definition) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<div class=\"definition-result\"><h2 class=\"word-title\">{}</h2>",
        escape_html(&definition.word)
    );
    if !definition.phonetic.is_empty() {
        let _ = write!(
            html,
            "<div class=\"phonetic\">{}</div>",
            escape_html(&definition.phonetic)
        );
    }

    if !definition.has_meanings() {
        html.push_str("<div class=\"error\">No definitions available</div>");
    }

    for meaning in &definition.meanings {
        let _ = write!(
            html,
            "<div class=\"meaning\"><div class=\"part-of-speech\">{}</div>",
            escape_html(&meaning.part_of_speech)
        );
        for sense in &meaning.definitions {
            let _ = write!(
                html,
                "<div class=\"definition\"><div class=\"definition-text\">{}</div>",
                escape_html(&sense.definition)
            );
            if !sense.example.is_empty() {
                let _ = write!(
                    html,
                    "<div class=\"example\">{}</div>",
                    escape_html(&sense.example)
                );
            }
            html.push_str("</div>");
        }
        html.push_str("</div>");
    }

    html.push_str("</div>");
    html
}
