//! Session aggregate and the static context transitions read from.

use std::time::Duration;

use crate::language::Language;
use crate::timer::{Countdown, INTERVIEW_DURATION};
use crate::types::{Message, Problem, Screen};

/// Everything the client knows about the interview in progress.
///
/// Fields are replaced whole by [`super::transition`]; nothing outside the
/// controller mutates a live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub screen: Screen,
    pub language: Language,
    /// Editor buffer.
    pub code: String,
    /// Chat history, oldest first.
    pub transcript: Vec<Message>,
    pub problem: Option<Problem>,
    pub countdown: Countdown,
    pub feedback: Option<String>,
    /// Identifier or URL from the most recent load request.
    pub pending_problem_text: String,
    pub is_awaiting_assistant: bool,
    pub is_generating_feedback: bool,
    pub is_loading_problem: bool,
    /// Generation counter. Bumped on reset and on every confirmed problem load;
    /// results stamped with an older epoch are dropped.
    pub epoch: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_language(Language::default())
    }
}

impl Session {
    /// A fresh session with `language` selected and its template in the editor.
    pub fn with_language(language: Language) -> Self {
        Self {
            screen: Screen::default(),
            language,
            code: language.template().to_owned(),
            transcript: Vec::new(),
            problem: None,
            countdown: Countdown::default(),
            feedback: None,
            pending_problem_text: String::new(),
            is_awaiting_assistant: false,
            is_generating_feedback: false,
            is_loading_problem: false,
            epoch: 0,
        }
    }

    /// Seconds left on the countdown; zero when none is running.
    pub fn time_remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    /// True while a chat turn or problem load is in flight.
    pub fn is_busy(&self) -> bool {
        self.is_awaiting_assistant || self.is_loading_problem
    }

    /// True until the first problem has loaded or any chat has happened.
    /// The language picker is shown for such requests.
    pub fn is_first_problem_request(&self) -> bool {
        self.problem.is_none() && self.transcript.is_empty()
    }

    /// Title sent along with the summarize request.
    pub fn problem_title(&self) -> &str {
        self.problem
            .as_ref()
            .map(|p| p.title.as_str())
            .unwrap_or(self.pending_problem_text.as_str())
    }
}

/// Timing knobs the transition function reads. Fixed for the life of a
/// controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Countdown length started on every successful problem load.
    pub interview_duration: Duration,
    /// Pause between a closing assistant reply and the automatic switch to feedback.
    pub auto_complete_delay: Duration,
    /// Delay before the second transcript clear after a reset.
    pub deferred_clear_delay: Duration,
}

impl Default for SessionContext {
    fn default() -> Self {
        Self {
            interview_duration: INTERVIEW_DURATION,
            auto_complete_delay: Duration::from_secs(1),
            deferred_clear_delay: Duration::from_secs(2),
        }
    }
}

impl SessionContext {
    pub fn interview_seconds(&self) -> u32 {
        u32::try_from(self.interview_duration.as_secs()).unwrap_or(u32::MAX)
    }
}
