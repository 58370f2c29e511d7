//! syntect highlighting for the code editor.
//!
//! Syntax and theme sets are loaded once on first use. Lines are highlighted
//! from the top of the buffer every frame because syntect's parse state
//! depends on every earlier line; interview-sized buffers make that cheap.

use std::sync::LazyLock;

use cody_core::Language;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;

static PS: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static TS: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const THEME_NAME: &str = "base16-ocean.dark";

/// Forces the lazy statics so the first frame does not stall.
pub fn warm_up() {
    let _ = &*PS;
    let _ = &*TS;
}

/// Converts a syntect (Style, &str) pair to an owned ratatui Span.
///
/// Background colors are dropped so the panel background shows through.
fn syntect_to_span(style: syntect::highlighting::Style, content: &str) -> Span<'static> {
    use syntect::highlighting::FontStyle;
    let fg = style.foreground;
    let mut ratatui_style = Style::default();
    if fg.a > 0 {
        ratatui_style = ratatui_style.fg(Color::Rgb(fg.r, fg.g, fg.b));
    }
    if style.font_style.contains(FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }
    Span::styled(content.trim_end_matches('\n').to_owned(), ratatui_style)
}

/// Highlights the first `upto` lines of `lines` as `language`.
///
/// Falls back to plain spans when the syntax or theme is unavailable or a
/// line fails to highlight.
pub fn highlight_lines(
    lines: &[String],
    language: Language,
    upto: usize,
) -> Vec<Vec<Span<'static>>> {
    let upto = upto.min(lines.len());
    let plain = |lines: &[String]| -> Vec<Vec<Span<'static>>> {
        lines.iter().map(|l| vec![Span::raw(l.clone())]).collect()
    };

    let theme = TS
        .themes
        .get(THEME_NAME)
        .or_else(|| TS.themes.values().next());
    let Some(theme) = theme else {
        return plain(&lines[..upto]);
    };
    let syntax = PS
        .find_syntax_by_extension(language.extension())
        .unwrap_or_else(|| PS.find_syntax_plain_text());
    let mut h = HighlightLines::new(syntax, theme);

    lines[..upto]
        .iter()
        .map(|line| {
            // The newline-aware syntax set expects each line to end in '\n'.
            let with_newline = format!("{line}\n");
            let Ok(ranges) = h.highlight_line(&with_newline, &PS) else {
                return vec![Span::raw(line.clone())];
            };
            ranges
                .into_iter()
                .map(|(style, text)| syntect_to_span(style, text))
                .collect()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_of(spans: &[Span<'_>]) -> String {
        spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn highlighting_preserves_text() {
        let lines: Vec<String> = Language::Python
            .template()
            .split('\n')
            .map(String::from)
            .collect();
        let out = highlight_lines(&lines, Language::Python, lines.len());
        assert_eq!(out.len(), lines.len());
        for (spans, line) in out.iter().zip(&lines) {
            assert_eq!(&text_of(spans), line);
        }
    }

    #[test]
    fn every_language_has_a_syntax() {
        for language in Language::ALL {
            assert!(
                PS.find_syntax_by_extension(language.extension()).is_some(),
                "no syntax for {}",
                language
            );
        }
    }

    #[test]
    fn upto_limits_output() {
        let lines = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(highlight_lines(&lines, Language::Go, 2).len(), 2);
        assert_eq!(highlight_lines(&lines, Language::Go, 10).len(), 3);
    }
}
