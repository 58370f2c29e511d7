//! Pure state transition function
//!
//! Given a session, the context, and one action, produces the next session and
//! the effects the runtime must carry out. No I/O happens here, which is what
//! lets the whole lifecycle be tested without a terminal or a server.

use thiserror::Error;

use super::effect::Effect;
use super::event::{Action, ReplyPurpose};
use super::state::{Session, SessionContext};
use crate::client::{ProblemReply, ServiceError, TextReply};
use crate::detector::is_session_ending;
use crate::language::Language;
use crate::timer::TickOutcome;
use crate::types::{Message, Problem, Screen};

pub const EVALUATION_PLACEHOLDER: &str = "Submitted for evaluation... Please wait...";
pub const NO_RESPONSE: &str = "No response";
pub const NO_EVALUATION_RESPONSE: &str = "No evaluation response received.";
pub const SERVER_UNREACHABLE: &str = "Server unreachable";
pub const EVALUATION_SERVER_ERROR: &str = "Server error during evaluation.";
pub const PROBLEM_SERVER_ERROR: &str = "Server error loading problem.";
pub const NO_FEEDBACK: &str = "No feedback generated. Check server logs.";
pub const FEEDBACK_SERVER_ERROR: &str =
    "Error fetching feedback. Ensure /summarize endpoint is active.";
pub const EMPTY_INTERVIEW_WARNING: &str = "Start an interview first!";

/// Result of a state transition
#[derive(Debug)]
pub struct TransitionResult {
    pub session: Session,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_effects(mut self, effects: impl IntoIterator<Item = Effect>) -> Self {
        self.effects.extend(effects);
        self
    }
}

/// Errors that can occur during transition
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Waiting for the assistant, try again when the reply arrives")]
    Busy,
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),
}

/// Pure transition function.
///
/// Rejected actions return an error and leave the caller's session untouched.
/// Results carrying a superseded epoch are accepted but change nothing.
pub fn transition(
    session: &Session,
    ctx: &SessionContext,
    action: Action,
) -> Result<TransitionResult, TransitionError> {
    match action {
        Action::RequestProblem { text } => request_problem(session, text),
        Action::ChooseLanguage(language) => choose_language(session, language),
        Action::SendMessage { text } => send_message(session, text),
        Action::ChangeLanguage(language) => change_language(session, language),
        Action::EditCode(code) => {
            let mut next = session.clone();
            next.code = code;
            Ok(TransitionResult::new(next))
        }
        Action::EvaluateCode => evaluate_code(session),
        Action::CompleteInterview => Ok(complete_interview(session)),
        Action::GenerateFeedback => Ok(generate_feedback(session.clone())),
        Action::Reset => Ok(reset(session, ctx)),
        Action::SelectRelatedProblem { id } => {
            if session.screen != Screen::Feedback {
                return Err(invalid("related problems are only offered on the feedback screen"));
            }
            request_problem(session, id)
        }

        Action::ProblemLoaded { epoch, .. }
        | Action::AssistantReplied { epoch, .. }
        | Action::FeedbackReady { epoch, .. }
        | Action::AutoComplete { epoch }
        | Action::DeferredClear { epoch }
            if epoch != session.epoch =>
        {
            Ok(unchanged(session))
        }
        Action::ProblemLoaded { result, .. } => Ok(problem_loaded(session, ctx, result)),
        Action::AssistantReplied { purpose, result, .. } => {
            Ok(assistant_replied(session, ctx, purpose, result))
        }
        Action::FeedbackReady { result, .. } => Ok(feedback_ready(session, result)),
        Action::CountdownTick { generation } => Ok(countdown_tick(session, generation)),
        Action::AutoComplete { .. } => {
            // A manual completion may already have happened during the delay.
            if session.screen == Screen::Interview {
                Ok(complete_interview(session))
            } else {
                Ok(unchanged(session))
            }
        }
        Action::DeferredClear { .. } => {
            let mut next = session.clone();
            next.transcript = Vec::new();
            Ok(TransitionResult::new(next))
        }
    }
}

fn unchanged(session: &Session) -> TransitionResult {
    TransitionResult::new(session.clone())
}

fn invalid(reason: &str) -> TransitionError {
    TransitionError::InvalidTransition(reason.to_owned())
}

// ============================================================
// Problem loading
// ============================================================

fn request_problem(session: &Session, text: String) -> Result<TransitionResult, TransitionError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(unchanged(session));
    }
    if session.is_loading_problem {
        return Err(TransitionError::Busy);
    }

    let mut next = session.clone();
    if session.is_first_problem_request() {
        next.screen = Screen::LanguageSelect;
        next.pending_problem_text = text.to_owned();
        return Ok(TransitionResult::new(next));
    }
    Ok(begin_load(next, text.to_owned()))
}

fn choose_language(
    session: &Session,
    language: Language,
) -> Result<TransitionResult, TransitionError> {
    if session.screen != Screen::LanguageSelect {
        return Err(invalid("no language choice is pending"));
    }
    let mut next = session.clone();
    next.language = language;
    next.code = language.template().to_owned();
    next.screen = Screen::Interview;

    let pending = next.pending_problem_text.trim().to_owned();
    if pending.is_empty() {
        Ok(TransitionResult::new(next))
    } else {
        Ok(begin_load(next, pending))
    }
}

/// Starts a new epoch and asks the service for the problem. Anything still in
/// flight for the previous problem is discarded when it lands.
fn begin_load(mut next: Session, text: String) -> TransitionResult {
    next.epoch += 1;
    next.transcript = Vec::new();
    next.pending_problem_text = text.clone();
    next.is_loading_problem = true;
    next.is_awaiting_assistant = false;
    next.is_generating_feedback = false;
    let epoch = next.epoch;
    TransitionResult::new(next).with_effect(Effect::LoadProblem { epoch, text })
}

fn problem_loaded(
    session: &Session,
    ctx: &SessionContext,
    result: Result<ProblemReply, ServiceError>,
) -> TransitionResult {
    let mut next = session.clone();
    next.is_loading_problem = false;

    let reply = match result {
        Ok(reply) => reply,
        Err(_) => return load_failed(next, PROBLEM_SERVER_ERROR.to_owned()),
    };
    if let Some(error) = reply.error.as_deref().filter(|e| !e.is_empty()) {
        return load_failed(next, format!("Error loading problem: {error}"));
    }

    let problem = reply.problem.unwrap_or_else(|| Problem {
        title: format!("LeetCode {}", next.pending_problem_text),
        description: reply.raw.unwrap_or_default(),
    });
    next.problem = Some(problem);
    next.code = next.language.template().to_owned();
    next.countdown.start(ctx.interview_seconds());
    next.screen = Screen::Interview;

    let display = next.language.display_name();
    let greeting = greeting_for(next.language);
    let start = Effect::StartCountdown {
        generation: next.countdown.generation(),
        seconds: next.countdown.remaining(),
    };
    let (next, ask) = ask_chat(next, greeting);
    TransitionResult::new(next).with_effects([
        start,
        Effect::SetLanguage {
            language: display.to_owned(),
        },
        ask,
    ])
}

/// The countdown stays stopped; the candidate can retry with another id.
fn load_failed(mut next: Session, text: String) -> TransitionResult {
    next.transcript.push(Message::assistant(text));
    TransitionResult::new(next)
}

/// Opening line sent on the candidate's behalf once a problem has loaded.
pub fn greeting_for(language: Language) -> String {
    format!(
        "Hello Cody! I'm ready to start the interview. I'll be coding in {}.",
        language.display_name()
    )
}

// ============================================================
// Chat
// ============================================================

fn send_message(session: &Session, text: String) -> Result<TransitionResult, TransitionError> {
    if text.trim().is_empty() {
        return Ok(unchanged(session));
    }
    if session.screen != Screen::Interview {
        return Err(invalid("chat is only available during the interview"));
    }
    if session.is_busy() {
        return Err(TransitionError::Busy);
    }
    let (next, ask) = ask_chat(session.clone(), text);
    Ok(TransitionResult::new(next).with_effect(ask))
}

/// Appends `text` as the candidate's message and builds the matching request.
fn ask_chat(mut next: Session, text: String) -> (Session, Effect) {
    next.transcript.push(Message::user(text.clone()));
    next.is_awaiting_assistant = true;
    let ask = Effect::Ask {
        epoch: next.epoch,
        message: text,
        language: Some(next.language.display_name().to_owned()),
        purpose: ReplyPurpose::Chat,
    };
    (next, ask)
}

fn change_language(
    session: &Session,
    language: Language,
) -> Result<TransitionResult, TransitionError> {
    if session.screen != Screen::Interview {
        return Err(invalid("language can only be changed during the interview"));
    }
    if language == session.language {
        return Ok(unchanged(session));
    }
    if session.is_busy() {
        return Err(TransitionError::Busy);
    }

    let mut next = session.clone();
    next.language = language;
    next.code = language.template().to_owned();
    let set = Effect::SetLanguage {
        language: language.display_name().to_owned(),
    };

    if next.transcript.is_empty() {
        return Ok(TransitionResult::new(next).with_effect(set));
    }
    let notice = format!(
        "I've switched to {}. Please continue the interview in this language.",
        language.display_name()
    );
    let (next, ask) = ask_chat(next, notice);
    Ok(TransitionResult::new(next).with_effects([set, ask]))
}

fn evaluate_code(session: &Session) -> Result<TransitionResult, TransitionError> {
    if session.screen != Screen::Interview {
        return Err(invalid("code can only be evaluated during the interview"));
    }
    let Some(problem) = session.problem.as_ref() else {
        return Ok(unchanged(session));
    };
    if session.code.trim().is_empty() {
        return Ok(unchanged(session));
    }
    if session.is_busy() {
        return Err(TransitionError::Busy);
    }

    let language = session.language;
    let message = format!(
        "Please evaluate my {} code for {}:\n\n```{}\n{}\n```",
        language.display_name(),
        problem.title,
        language.key(),
        session.code
    );

    let mut next = session.clone();
    let placeholder = next.transcript.len();
    let pending = Message::assistant(EVALUATION_PLACEHOLDER);
    next.transcript.push(pending);
    next.is_awaiting_assistant = true;
    let epoch = next.epoch;
    Ok(TransitionResult::new(next).with_effect(Effect::Ask {
        epoch,
        message,
        language: Some(language.display_name().to_owned()),
        purpose: ReplyPurpose::Evaluation { placeholder },
    }))
}

fn assistant_replied(
    session: &Session,
    ctx: &SessionContext,
    purpose: ReplyPurpose,
    result: Result<TextReply, ServiceError>,
) -> TransitionResult {
    let mut next = session.clone();
    next.is_awaiting_assistant = false;

    let (text, answered) = match &result {
        Ok(reply) => {
            let fallback = match purpose {
                ReplyPurpose::Chat => NO_RESPONSE,
                ReplyPurpose::Evaluation { .. } => NO_EVALUATION_RESPONSE,
            };
            let text = reply
                .response_text()
                .or(reply.error_text())
                .unwrap_or(fallback);
            (text.to_owned(), true)
        }
        Err(_) => {
            let text = match purpose {
                ReplyPurpose::Chat => SERVER_UNREACHABLE,
                ReplyPurpose::Evaluation { .. } => EVALUATION_SERVER_ERROR,
            };
            (text.to_owned(), false)
        }
    };
    let ending = answered && is_session_ending(&text);
    let reply = Message::assistant(text);

    match placeholder_index(&next, purpose) {
        Some(index) => next.transcript[index] = reply,
        None => next.transcript.push(reply),
    }

    let epoch = next.epoch;
    let result = TransitionResult::new(next);
    if ending {
        result.with_effect(Effect::ScheduleCompletion {
            delay: ctx.auto_complete_delay,
            epoch,
        })
    } else {
        result
    }
}

/// Index of the evaluation placeholder an answer should replace, if it is
/// still in the transcript.
fn placeholder_index(session: &Session, purpose: ReplyPurpose) -> Option<usize> {
    let ReplyPurpose::Evaluation { placeholder } = purpose else {
        return None;
    };
    let message = session.transcript.get(placeholder)?;
    (*message == Message::assistant(EVALUATION_PLACEHOLDER)).then_some(placeholder)
}

// ============================================================
// Countdown and completion
// ============================================================

fn countdown_tick(session: &Session, generation: u64) -> TransitionResult {
    let mut next = session.clone();
    match next.countdown.tick(generation) {
        TickOutcome::Ignored => unchanged(session),
        TickOutcome::Running => TransitionResult::new(next),
        TickOutcome::Expired => {
            if next.screen == Screen::Interview && !next.transcript.is_empty() {
                enter_feedback(next)
            } else {
                TransitionResult::new(next).with_effect(Effect::StopCountdown)
            }
        }
    }
}

fn complete_interview(session: &Session) -> TransitionResult {
    if session.transcript.is_empty() {
        return unchanged(session).with_effect(Effect::warn(EMPTY_INTERVIEW_WARNING));
    }
    enter_feedback(session.clone())
}

/// Switches to the feedback screen, stops the clock, and starts summarizing.
fn enter_feedback(mut next: Session) -> TransitionResult {
    next.screen = Screen::Feedback;
    next.countdown.stop();
    generate_feedback(next).with_effect(Effect::StopCountdown)
}

fn generate_feedback(mut next: Session) -> TransitionResult {
    if next.transcript.is_empty() || next.is_generating_feedback {
        return TransitionResult::new(next);
    }
    next.is_generating_feedback = true;
    let effect = Effect::Summarize {
        epoch: next.epoch,
        chat_history: next.transcript.clone(),
        problem_title: next.problem_title().to_owned(),
    };
    TransitionResult::new(next).with_effect(effect)
}

fn feedback_ready(session: &Session, result: Result<TextReply, ServiceError>) -> TransitionResult {
    let mut next = session.clone();
    next.is_generating_feedback = false;
    let text = match &result {
        Ok(reply) => reply.response_text().unwrap_or(NO_FEEDBACK),
        Err(_) => FEEDBACK_SERVER_ERROR,
    };
    next.feedback = Some(text.to_owned());
    TransitionResult::new(next)
}

// ============================================================
// Reset
// ============================================================

fn reset(session: &Session, ctx: &SessionContext) -> TransitionResult {
    let mut next = Session::with_language(session.language);
    next.epoch = session.epoch + 1;
    next.countdown = session.countdown;
    next.countdown.stop();
    let epoch = next.epoch;
    TransitionResult::new(next).with_effects([
        Effect::NotifyReset,
        Effect::StopCountdown,
        Effect::ScheduleTranscriptClear {
            delay: ctx.deferred_clear_delay,
            epoch,
        },
    ])
}
