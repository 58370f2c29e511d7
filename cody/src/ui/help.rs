//! Help and quit-confirmation overlays.
//!
//! Both are drawn inside the same `terminal.draw()` closure as the panels:
//! `Clear` erases the overlay area, then a bordered `Paragraph` goes on top.

use ratatui::{
    layout::Constraint,
    style::{Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme::Theme;

/// Renders the help overlay as a centred modal. Skipped below 60 columns.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(80), Constraint::Percentage(80));
    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help: j/k scroll, Esc to dismiss ")
        .border_style(Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Interview"),
        Line::from("  Tab / Shift-Tab   Move focus: problem, chat, editor"),
        Line::from("  Enter             Load problem / send message"),
        Line::from("  Ctrl-e            Submit code for evaluation"),
        Line::from("  Ctrl-l            Switch to the next language"),
        Line::from("  Ctrl-f            Finish the interview and get feedback"),
        Line::from("  Ctrl-r            Reset the session"),
        Line::from("  PgUp / PgDn       Scroll the chat"),
        Line::from("  Ctrl-u / Ctrl-d   Scroll the problem description"),
        Line::from(""),
        Line::from("Editor"),
        Line::from("  Tab               Indent"),
        Line::from("  Esc               Leave the editor"),
        Line::from(""),
        Line::from("Feedback"),
        Line::from("  1 / 2 / 3         Start a related problem"),
        Line::from("  g                 Generate feedback again"),
        Line::from("  n                 New interview"),
        Line::from("  j / k             Scroll the report"),
        Line::from(""),
        Line::from("Language picker"),
        Line::from("  j / k, 1-4        Select"),
        Line::from("  Enter / Esc       Choose / skip (JavaScript)"),
        Line::from(""),
        Line::from("General"),
        Line::from("  F1                Open / close this help"),
        Line::from("  Esc, Ctrl-c       Quit (asks first)"),
    ])
}

/// Renders the "Quit? y/n" dialog.
pub fn render_confirm_quit(frame: &mut Frame, theme: &Theme) {
    let area = frame
        .area()
        .centered(Constraint::Length(36), Constraint::Length(5));
    frame.render_widget(Clear, area);
    let block = Block::bordered()
        .title(" Quit ")
        .border_style(Style::default().fg(theme.warning));
    let text = Text::from(vec![
        Line::from("Leave the interview?").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("y: quit    n / Esc: stay"),
    ]);
    frame.render_widget(Paragraph::new(text).block(block).centered(), area);
}
