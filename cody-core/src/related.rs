//! Related-problem extractor.
//!
//! Mines the feedback report for the follow-up problems the assistant
//! recommends. The report is free-form markdown, so this is line-oriented
//! pattern matching rather than a parser:
//!
//! 1. Every line after the first one mentioning "related problems" is a
//!    candidate. There is no closing header; capture runs to the end of the text.
//! 2. Candidates must start with an ordinal (`3. `).
//! 3. Ordinal lines that also carry `(LeetCode <id>)` after a title become
//!    [`RelatedProblem`]s. Other ordinal lines are skipped.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::RelatedProblem;

/// How many related problems the feedback screen offers.
pub const RELATED_DISPLAY_LIMIT: usize = 3;

const SECTION_HEADER: &str = "related problems";

static ORDINAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s").expect("ordinal pattern is valid"));

static ENTRY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^\d+\.\s+(?:\*\*)?"?(.+?)"?\s*\(LeetCode\s*(\d+)\)"#)
        .expect("related entry pattern is valid")
});

/// Extracts every related problem listed after the "related problems" header,
/// in order of appearance. Duplicates are kept.
pub fn extract_related_problems(feedback: &str) -> Vec<RelatedProblem> {
    let mut capturing = false;
    let mut found = Vec::new();

    for line in feedback.lines() {
        let line = line.trim();
        if line.to_lowercase().contains(SECTION_HEADER) {
            capturing = true;
            continue;
        }
        if !capturing || !ORDINAL_RE.is_match(line) {
            continue;
        }
        if let Some(caps) = ENTRY_RE.captures(line) {
            found.push(RelatedProblem {
                id: caps[2].to_owned(),
                title: clean_title(&caps[1]),
            });
        }
    }

    found
}

/// Like [`extract_related_problems`], capped at [`RELATED_DISPLAY_LIMIT`].
pub fn related_for_display(feedback: &str) -> Vec<RelatedProblem> {
    let mut problems = extract_related_problems(feedback);
    problems.truncate(RELATED_DISPLAY_LIMIT);
    problems
}

/// Drops bold markers and quotes left around the title by the lazy capture.
fn clean_title(raw: &str) -> String {
    raw.trim()
        .trim_end_matches("**")
        .trim_matches('"')
        .trim()
        .to_owned()
}
