//! Language picker shown before the first problem loads.

use ratatui::{
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Clear, Paragraph},
    Frame,
};

use cody_core::{Language, Session};

use crate::app::AppState;
use crate::theme::Theme;

/// Renders the picker as a centred modal over the interview screen.
pub fn render(frame: &mut Frame, state: &AppState, session: &Session, theme: &Theme) {
    let height = Language::ALL.len() as u16 + 6;
    let area = frame
        .area()
        .centered(Constraint::Length(44), Constraint::Length(height));
    frame.render_widget(Clear, area);

    let block = Block::bordered()
        .title(" Choose a language ")
        .border_style(Style::default().fg(theme.border_active));

    let mut lines = vec![
        Line::from(Span::styled(
            format!("Problem: {}", session.pending_problem_text),
            Style::default().fg(theme.muted),
        )),
        Line::default(),
    ];
    for (i, language) in Language::ALL.iter().enumerate() {
        let selected = i == state.language_cursor;
        let marker = if selected { "> " } else { "  " };
        let style = if selected {
            Style::default()
                .fg(theme.border_active)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}. {}", i + 1, language.display_name()),
            style,
        )));
    }
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "j/k move  Enter choose  Esc skip (JavaScript)",
        Style::default().fg(theme.muted),
    )));

    frame.render_widget(Paragraph::new(Text::from(lines)).block(block), area);
}
