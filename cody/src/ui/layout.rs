//! Layout arithmetic and shared widgets for cody.
//!
//! Pure functions of the frame size; called inside `terminal.draw()` on every
//! render so each frame reflects the current terminal size.
//!
//! At `>= 100` columns the interview shows the chat column and the editor side
//! by side. Narrower terminals stack the editor under the chat.

use ratatui::{
    layout::{Constraint, Layout, Margin, Rect, Spacing},
    style::{Modifier, Style},
    symbols::merge::MergeStrategy,
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
    Frame,
};

use crate::app::{AppState, Focus, Mode};
use crate::theme::Theme;

/// Width at which the editor moves beside the chat column.
const SIDE_BY_SIDE_MIN_WIDTH: u16 = 100;

/// Returns `[header, main, status_bar]` for the current frame.
pub fn compute_frame(area: Rect) -> [Rect; 3] {
    area.layout(&Layout::vertical([
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ]))
}

/// Interview panel rects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterviewAreas {
    pub problem_input: Rect,
    pub problem: Rect,
    pub chat: Rect,
    pub chat_input: Rect,
    pub editor: Rect,
}

/// Splits the main area into the interview panels.
pub fn compute_interview(main: Rect) -> InterviewAreas {
    let (left, editor) = if main.width >= SIDE_BY_SIDE_MIN_WIDTH {
        let [left, right] = main.layout(
            &Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                .spacing(Spacing::Overlap(1)),
        );
        (left, right)
    } else {
        let [top, bottom] = main.layout(
            &Layout::vertical([Constraint::Percentage(55), Constraint::Percentage(45)])
                .spacing(Spacing::Overlap(1)),
        );
        (top, bottom)
    };

    let [problem_input, problem, chat, chat_input] = left.layout(
        &Layout::vertical([
            Constraint::Length(3),
            Constraint::Percentage(35),
            Constraint::Fill(1),
            Constraint::Length(3),
        ])
        .spacing(Spacing::Overlap(1)),
    );

    InterviewAreas {
        problem_input,
        problem,
        chat,
        chat_input,
        editor,
    }
}

/// Inner `Rect` of a bordered panel.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin::new(1, 1))
}

/// Bordered `Block` for a panel; thick border when focused.
///
/// `MergeStrategy::Fuzzy` lets thick and plain borders share junctions.
pub fn panel_block<'a>(title: impl Into<Line<'a>>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused {
        BorderType::Thick
    } else {
        BorderType::Plain
    };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
        .merge_borders(MergeStrategy::Fuzzy)
}

/// Word-wraps `text` to `width` columns, keeping blank lines.
///
/// Words longer than `width` are split. Widths are counted in `char`s, not
/// display columns, so lines holding wide glyphs (CJK, most emoji) can run
/// past the panel edge.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();
    for raw in text.lines() {
        let mut line = String::new();
        let mut len = 0;
        for word in raw.split(' ') {
            let word_len = word.chars().count();
            if len > 0 && len + 1 + word_len > width {
                out.push(std::mem::take(&mut line));
                len = 0;
            }
            if len > 0 {
                line.push(' ');
                len += 1;
            }
            let mut rest = word;
            while len + rest.chars().count() > width {
                let split = rest
                    .char_indices()
                    .nth(width - len)
                    .map_or(rest.len(), |(i, _)| i);
                line.push_str(&rest[..split]);
                out.push(std::mem::take(&mut line));
                len = 0;
                rest = &rest[split..];
            }
            line.push_str(rest);
            len += rest.chars().count();
        }
        out.push(line);
    }
    if out.is_empty() {
        out.push(String::new());
    }
    out
}

/// Renders the 1-row status bar: mode, focused panel, busy indicator, and the
/// current notice or key hint.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    busy: Option<&str>,
    hint: &str,
    theme: &Theme,
) {
    let mode_text = match state.mode {
        Mode::Normal => match state.focus {
            Focus::ProblemInput => " PROBLEM ",
            Focus::ChatInput => " CHAT ",
            Focus::Editor => " EDIT ",
        },
        Mode::HelpOverlay => " HELP ",
        Mode::ConfirmQuit => " QUIT? ",
    };

    let mut spans = vec![Span::styled(
        mode_text,
        Style::default()
            .fg(theme.status_mode)
            .add_modifier(Modifier::BOLD),
    )];
    if let Some(busy) = busy {
        spans.push(Span::styled(format!(" {busy} "), Style::default().fg(theme.muted)));
    }
    match state.notice() {
        Some(notice) => {
            spans.push(Span::styled(format!(" {notice}"), Style::default().fg(theme.warning)))
        }
        None => spans.push(Span::raw(format!(" {hint}"))),
    }

    let bar_style = Style::default()
        .bg(theme.status_bar_bg)
        .fg(theme.status_bar_fg);
    frame.render_widget(Paragraph::new(Line::from(spans)).style(bar_style), area);
}
