//! End-of-interview detector.
//!
//! A keyword heuristic over assistant replies. Any closure phrase appearing as
//! whole words anywhere in the text counts, so an assistant that merely talks
//! about "the end of interview loops" ends the session too. That false positive
//! is accepted; callers only use the result to schedule a delayed completion.

use std::sync::LazyLock;

use regex::Regex;

/// Phrases whose presence means the assistant considers the interview over.
/// Spaces match any run of whitespace.
pub const CLOSURE_PHRASES: [&str; 8] = [
    "end of interview",
    "goodbye",
    "session ended",
    "bye",
    "reached conclusion",
    "session concluded",
    "time to end the session",
    "time to wrap up",
];

static CLOSURE_RE: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives: Vec<String> = CLOSURE_PHRASES
        .iter()
        .map(|phrase| {
            let words: Vec<_> = phrase.split(' ').map(regex::escape).collect();
            words.join(r"\s+")
        })
        .collect();
    let pattern = format!(r"(?i)\b(?:{})\b", alternatives.join("|"));
    Regex::new(&pattern).expect("closure phrase pattern is valid")
});

/// Returns `true` if `text` contains any closure phrase as whole words,
/// ignoring case.
pub fn is_session_ending(text: &str) -> bool {
    CLOSURE_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_phrase_matches_inside_a_sentence() {
        for phrase in CLOSURE_PHRASES {
            let loud = phrase.to_uppercase();
            let text = format!("Thanks for your time. {loud}, see you soon.");
            assert!(is_session_ending(&text), "expected match for {phrase:?}");
        }
    }

    #[test]
    fn ordinary_replies_do_not_match() {
        assert!(!is_session_ending("let's continue coding"));
        assert!(!is_session_ending("What is the time complexity of your approach?"));
        assert!(!is_session_ending(""));
    }

    #[test]
    fn goodbye_with_punctuation_matches() {
        assert!(is_session_ending("Great job, goodbye!"));
        assert!(is_session_ending("Bye."));
    }

    #[test]
    fn phrases_must_be_whole_words() {
        assert!(!is_session_ending("That is a byproduct of hashing."));
        assert!(!is_session_ending("Say your goodbyes later."));
        assert!(!is_session_ending("The session endedness is unclear."));
    }

    #[test]
    fn whitespace_inside_phrase_is_flexible() {
        assert!(is_session_ending("It is time to\n wrap   up."));
        assert!(is_session_ending("We have Reached Conclusion on this one."));
    }

    #[test]
    fn academic_mention_still_triggers() {
        assert!(is_session_ending("Candidates often relax near the end of interview rounds."));
    }
}
