//! UI rendering module for cody.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. It draws the header, the screen for the current
//! session phase, the status bar, and any overlay on top.

pub mod feedback;
pub mod help;
pub mod highlight;
pub mod interview;
pub mod keybindings;
pub mod language_select;
pub mod layout;

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use cody_core::{Screen, Session};

use crate::app::{AppState, Focus, Mode};
use crate::theme::Theme;
use layout::{compute_frame, render_status_bar};

/// Countdown turns to the warning color below this many seconds.
const LOW_TIME_SECS: u32 = 300;

/// Renders one complete frame.
///
/// Viewport heights and panel rects are written back into `state` by the
/// screen renderers so the next key or mouse event can use them.
pub fn render(frame: &mut Frame, state: &mut AppState, session: &Session, theme: &Theme) {
    let [header, main, status_bar] = compute_frame(frame.area());

    render_header(frame, header, session, theme);

    match session.screen {
        Screen::LanguageSelect | Screen::Interview => {
            interview::render(frame, main, state, session, theme);
        }
        Screen::Feedback => feedback::render(frame, main, state, session, theme),
    }

    let busy = busy_text(session);
    let hint = hint_text(state, session);
    render_status_bar(frame, status_bar, state, busy, hint, theme);

    if session.screen == Screen::LanguageSelect {
        language_select::render(frame, state, session, theme);
    }
    match state.mode {
        Mode::HelpOverlay => help::render_help_overlay(frame, theme, state.help_scroll),
        Mode::ConfirmQuit => help::render_confirm_quit(frame, theme),
        Mode::Normal => {}
    }
}

fn render_header(frame: &mut Frame, area: Rect, session: &Session, theme: &Theme) {
    let timer = session.countdown.format();
    let timer_width = u16::try_from(timer.len() + 2).unwrap_or(area.width);
    let [left, right] =
        area.layout(&Layout::horizontal([Constraint::Fill(1), Constraint::Length(timer_width)]));

    let mut spans = vec![Span::styled(
        " cody ",
        Style::default()
            .fg(theme.title)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(problem) = &session.problem {
        spans.push(Span::styled(problem.title.clone(), Style::default().fg(theme.text)));
        spans.push(Span::styled(
            format!("  [{}]", session.language.display_name()),
            Style::default().fg(theme.muted),
        ));
    } else {
        spans.push(Span::styled(
            format!("[{}]", session.language.display_name()),
            Style::default().fg(theme.muted),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), left);

    let color = if session.countdown.is_active() && session.time_remaining() < LOW_TIME_SECS {
        theme.timer_low
    } else {
        theme.timer
    };
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!(" {timer} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))),
        right,
    );
}

fn busy_text(session: &Session) -> Option<&'static str> {
    if session.is_loading_problem {
        Some("Loading problem...")
    } else if session.is_awaiting_assistant {
        Some("Cody is thinking...")
    } else if session.is_generating_feedback {
        Some("Generating feedback...")
    } else {
        None
    }
}

fn hint_text(state: &AppState, session: &Session) -> &'static str {
    match session.screen {
        Screen::LanguageSelect => "Enter choose  Esc skip  F1 help",
        Screen::Feedback => "1-3 related  g regenerate  n new interview  q quit  F1 help",
        Screen::Interview => match state.focus {
            Focus::ProblemInput => "Enter load  Tab next panel  F1 help",
            Focus::ChatInput => "Enter send  ^E evaluate  ^F finish  F1 help",
            Focus::Editor => "Esc leave editor  ^E evaluate  ^L language  F1 help",
        },
    }
}
