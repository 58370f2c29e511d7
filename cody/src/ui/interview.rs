//! Interview screen: problem input, problem description, chat, and editor.

use std::sync::LazyLock;

use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame,
};
use regex::Regex;

use cody_core::{Role, Session};

use crate::app::{AppState, Focus, InputLine};
use crate::theme::Theme;
use crate::ui::highlight::highlight_lines;
use crate::ui::layout::{compute_interview, inner_rect, panel_block, wrap_text};

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<br\s*/?>|</p>|</li>|<[^>]*>").expect("tag pattern is valid")
});
static BLANK_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(\n[ \t]*){2,}").expect("blank-run pattern is valid"));

/// Turns the HTML problem description into plain text.
///
/// Block-ending tags become newlines, other tags are dropped, common entities
/// are decoded, and runs of blank lines collapse to one.
pub fn strip_markup(html: &str) -> String {
    let text = TAG_RE.replace_all(html, |caps: &regex::Captures<'_>| {
        let tag = caps[0].to_ascii_lowercase();
        if tag.starts_with("<br") || tag == "</p>" || tag == "</li>" {
            "\n"
        } else {
            ""
        }
    });
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    BLANK_RUN_RE.replace_all(&text, "\n\n").trim().to_owned()
}

/// Renders the interview panels into `main`.
pub fn render(
    frame: &mut Frame,
    main: Rect,
    state: &mut AppState,
    session: &Session,
    theme: &Theme,
) {
    let areas = compute_interview(main);
    state.focus_rects = [areas.problem_input, areas.chat_input, areas.editor];
    state.chat_viewport_height = inner_rect(areas.chat).height;
    state.editor_viewport_height = inner_rect(areas.editor).height;

    let problem_hint = if session.is_loading_problem {
        "Loading problem..."
    } else {
        "e.g. 1 or a LeetCode URL"
    };
    let chat_hint = if session.is_awaiting_assistant {
        "Cody is thinking..."
    } else {
        "Type a message, Enter to send"
    };

    render_input(
        frame,
        areas.problem_input,
        " Problem (id or URL) ",
        &state.problem_input,
        state.focus == Focus::ProblemInput,
        problem_hint,
        theme,
    );
    render_problem(frame, areas.problem, state.problem_scroll, session, theme);
    render_chat(frame, areas.chat, state, session, theme);
    render_input(
        frame,
        areas.chat_input,
        " Message ",
        &state.chat_input,
        state.focus == Focus::ChatInput,
        chat_hint,
        theme,
    );
    render_editor(frame, areas.editor, state, session, theme);
}

fn render_input(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    input: &InputLine,
    is_focused: bool,
    placeholder: &str,
    theme: &Theme,
) {
    let inner = inner_rect(area);
    frame.render_widget(panel_block(title.to_owned(), is_focused, theme), area);

    let width = usize::from(inner.width.max(1));
    let chars: Vec<char> = input.text().chars().collect();
    // Keep the cursor visible by scrolling the line horizontally.
    let start = input.cursor().saturating_sub(width - 1);
    let visible: String = chars.iter().skip(start).take(width).collect();

    let line = if chars.is_empty() && !is_focused {
        Line::from(Span::styled(placeholder.to_owned(), Style::default().fg(theme.muted)))
    } else {
        Line::from(Span::styled(visible, Style::default().fg(theme.text)))
    };
    frame.render_widget(Paragraph::new(line), inner);

    if is_focused {
        let offset = u16::try_from(input.cursor() - start).unwrap_or(inner.width);
        let x = inner.x.saturating_add(offset);
        let x = x.min(inner.right().saturating_sub(1));
        frame.set_cursor_position(Position::new(x, inner.y));
    }
}

fn render_problem(frame: &mut Frame, area: Rect, scroll: u16, session: &Session, theme: &Theme) {
    let title = match &session.problem {
        Some(problem) => format!(" {} ", problem.title),
        None => " No problem loaded ".to_owned(),
    };
    let inner = inner_rect(area);
    frame.render_widget(panel_block(title, false, theme), area);

    let body = session
        .problem
        .as_ref()
        .map(|p| strip_markup(&p.description))
        .unwrap_or_else(|| "Enter a problem id above to start.".to_owned());
    let lines: Vec<Line<'static>> = wrap_text(&body, usize::from(inner.width))
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(theme.text))))
        .collect();
    let description = Paragraph::new(Text::from(lines)).scroll((scroll, 0));
    frame.render_widget(description, inner);
}

/// Builds the wrapped chat transcript, one blank line between turns.
pub fn chat_lines(session: &Session, width: usize, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in &session.transcript {
        let (label, color) = match message.role {
            Role::User => ("You", theme.chat_user),
            Role::Assistant => ("Cody", theme.chat_assistant),
        };
        lines.push(Line::from(Span::styled(
            label,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )));
        for l in wrap_text(&message.content, width) {
            lines.push(Line::from(Span::styled(l, Style::default().fg(theme.text))));
        }
        lines.push(Line::default());
    }
    if session.is_awaiting_assistant {
        lines.push(Line::from(Span::styled(
            "Cody is thinking...",
            Style::default()
                .fg(theme.muted)
                .add_modifier(Modifier::ITALIC),
        )));
    }
    lines
}

fn render_chat(
    frame: &mut Frame,
    area: Rect,
    state: &mut AppState,
    session: &Session,
    theme: &Theme,
) {
    let inner = inner_rect(area);
    frame.render_widget(panel_block(" Chat ", false, theme), area);

    let lines = chat_lines(session, usize::from(inner.width), theme);
    let total = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let bottom = total.saturating_sub(inner.height);
    state.chat_scroll_back = state.chat_scroll_back.min(bottom);
    let offset = bottom - state.chat_scroll_back;
    let chat = Paragraph::new(Text::from(lines)).scroll((offset, 0));
    frame.render_widget(chat, inner);
}

fn render_editor(
    frame: &mut Frame,
    area: Rect,
    state: &mut AppState,
    session: &Session,
    theme: &Theme,
) {
    let is_focused = state.focus == Focus::Editor;
    let title = format!(" {} ", session.language.display_name());
    let inner = inner_rect(area);
    frame.render_widget(panel_block(title, is_focused, theme), area);

    let height = usize::from(inner.height);
    state.editor.scroll_to_cursor(height);
    let editor = &state.editor;
    let start = editor.scroll;
    let end = (start + height).min(editor.lines().len());
    let highlighted = highlight_lines(editor.lines(), session.language, end);

    let gutter = editor.lines().len().to_string().len();
    let lines: Vec<Line<'static>> = highlighted
        .into_iter()
        .enumerate()
        .skip(start)
        .map(|(i, spans)| {
            let mut line = vec![Span::styled(
                format!("{:>gutter$} ", i + 1),
                Style::default().fg(theme.muted),
            )];
            line.extend(spans);
            Line::from(line)
        })
        .collect();
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);

    if is_focused {
        let (row, col) = editor.cursor();
        let x = inner.x + u16::try_from(gutter + 1 + col).unwrap_or(inner.width);
        let y = inner.y + u16::try_from(row.saturating_sub(start)).unwrap_or(inner.height);
        if x < inner.right() && y < inner.bottom() {
            frame.set_cursor_position(Position::new(x, y));
        }
    }
}
