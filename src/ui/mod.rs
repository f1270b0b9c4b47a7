//! UI rendering module for quickdef
//!
//! This module contains all the rendering logic for the terminal popup,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod popup;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

pub use help_overlay::render as render_help_overlay;

/// Renders the search box, the result pane and the footer
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_search_box(frame, chunks[0], app);
    popup::render(frame, chunks[1], &app.surface, app.scroll_offset);
    render_footer(frame, chunks[2]);

    if app.show_help {
        render_help_overlay(frame);
    }
}

fn render_search_box(frame: &mut Frame, area: ratatui::layout::Rect, app: &App) {
    let line = if app.input.is_empty() {
        Line::from(Span::styled(
            app.placeholder.clone(),
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(app.input.clone())
    };

    let border = if app.can_search() { Color::Cyan } else { Color::Gray };
    let block = Block::default()
        .title(" Look up ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    frame.render_widget(Paragraph::new(line).block(block), area);
}

fn render_footer(frame: &mut Frame, area: ratatui::layout::Rect) {
    let footer = Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::raw(" search  "),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::raw(" close/quit  "),
        Span::styled("F1", Style::default().fg(Color::Yellow)),
        Span::raw(" help"),
    ]);
    frame.render_widget(Paragraph::new(footer), area);
}
