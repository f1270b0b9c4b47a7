//! Result pane rendering
//!
//! Draws the toolbar surface's current state: a hint while idle, a loading
//! placeholder, the definition, or the error message.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use quickdef::surface::{PopupState, Surface};
use quickdef::Definition;

/// Renders the result pane for `surface`
pub fn render(frame: &mut Frame, area: Rect, surface: &Surface, scroll_offset: u16) {
    let (title, lines) = match surface.state() {
        PopupState::Idle => (
            " Definition ",
            vec![Line::from(Span::styled(
                "Type a word and press Enter",
                Style::default().fg(Color::DarkGray),
            ))],
        ),
        PopupState::Loading { .. } => (
            " Definition ",
            vec![Line::from(Span::styled(
                "Searching for definition...",
                Style::default().fg(Color::Cyan),
            ))],
        ),
        PopupState::Error(message) => (
            " Error ",
            vec![Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            ))],
        ),
        PopupState::Success(definition) => (" Definition ", definition_lines(definition)),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll_offset, 0));

    frame.render_widget(paragraph, area);
}

/// Builds the styled lines for a definition
pub fn definition_lines(definition: &Definition) -> Vec<Line<'static>> {
    let mut header = vec![Span::styled(
        definition.word.clone(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    if !definition.phonetic.is_empty() {
        header.push(Span::raw("  "));
        header.push(Span::styled(
            definition.phonetic.clone(),
            Style::default().fg(Color::Gray),
        ));
    }

    let mut lines = vec![Line::from(header)];

    if !definition.has_meanings() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "No definitions available",
            Style::default().fg(Color::Red),
        )));
        return lines;
    }

    for meaning in &definition.meanings {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            meaning.part_of_speech.clone(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        )));
        for (i, sense) in meaning.definitions.iter().enumerate() {
            lines.push(Line::from(format!("  {}. {}", i + 1, sense.definition)));
            if !sense.example.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("     \"{}\"", sense.example),
                    Style::default().fg(Color::DarkGray),
                )));
            }
        }
    }

    lines
}
