//! Feedback screen: the generated report and up to three follow-up problems.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::Paragraph,
    Frame,
};

use cody_core::related::related_for_display;
use cody_core::{RelatedProblem, Session};

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block, wrap_text};

pub fn render(
    frame: &mut Frame,
    main: Rect,
    state: &mut AppState,
    session: &Session,
    theme: &Theme,
) {
    let related = session
        .feedback
        .as_deref()
        .map(related_for_display)
        .unwrap_or_default();
    let related_height = if related.is_empty() {
        0
    } else {
        related.len() as u16 + 2
    };
    let [report_area, related_area] = main.layout(&Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(related_height),
    ]));

    render_report(frame, report_area, state, session, theme);
    if !related.is_empty() {
        render_related(frame, related_area, &related, theme);
    }
}

fn render_report(
    frame: &mut Frame,
    area: Rect,
    state: &mut AppState,
    session: &Session,
    theme: &Theme,
) {
    let title = format!(" Feedback: {} ", session.problem_title());
    let inner = inner_rect(area);
    frame.render_widget(panel_block(title, true, theme), area);

    let text = match (&session.feedback, session.is_generating_feedback) {
        (_, true) => Text::from(Line::from(Span::styled(
            "Generating feedback...",
            Style::default()
                .fg(theme.muted)
                .add_modifier(Modifier::ITALIC),
        ))),
        (Some(feedback), false) => {
            let lines: Vec<Line<'static>> = wrap_text(feedback, usize::from(inner.width))
                .into_iter()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(theme.text))))
                .collect();
            let max_scroll = u16::try_from(lines.len())
                .unwrap_or(u16::MAX)
                .saturating_sub(inner.height);
            state.feedback_scroll = state.feedback_scroll.min(max_scroll);
            Text::from(lines)
        }
        (None, false) => Text::from(Line::from(Span::styled(
            "No feedback yet. Press g to generate.",
            Style::default().fg(theme.muted),
        ))),
    };
    let report = Paragraph::new(text).scroll((state.feedback_scroll, 0));
    frame.render_widget(report, inner);
}

fn render_related(frame: &mut Frame, area: Rect, related: &[RelatedProblem], theme: &Theme) {
    let inner = inner_rect(area);
    frame.render_widget(panel_block(" Related problems ", false, theme), area);

    let lines: Vec<Line<'static>> = related
        .iter()
        .enumerate()
        .map(|(i, problem)| {
            Line::from(vec![
                Span::styled(
                    format!("[{}] ", i + 1),
                    Style::default()
                        .fg(theme.related)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(problem.title.clone(), Style::default().fg(theme.text)),
                Span::styled(
                    format!("  (LeetCode {})", problem.id),
                    Style::default().fg(theme.muted),
                ),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(Text::from(lines)), inner);
}
