//! Actions fed into the state machine.
//!
//! User-initiated actions come from the key dispatcher. Result actions come
//! back from the runtime and carry the epoch (or countdown generation) the
//! request was issued under.

use crate::client::{ProblemReply, ServiceError, TextReply};
use crate::language::Language;

/// What a chat turn was sent for; decides where its reply lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyPurpose {
    /// Ordinary turn. The reply is appended.
    Chat,
    /// Code evaluation. The reply replaces the placeholder at this transcript index.
    Evaluation { placeholder: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Load a problem by LeetCode id or URL.
    RequestProblem { text: String },
    /// Pick a language on the language-select screen.
    ChooseLanguage(Language),
    SendMessage { text: String },
    /// Switch language mid-interview.
    ChangeLanguage(Language),
    /// Replace the editor buffer.
    EditCode(String),
    EvaluateCode,
    CompleteInterview,
    GenerateFeedback,
    Reset,
    /// Load one of the problems recommended on the feedback screen.
    SelectRelatedProblem { id: String },

    ProblemLoaded {
        epoch: u64,
        result: Result<ProblemReply, ServiceError>,
    },
    AssistantReplied {
        epoch: u64,
        purpose: ReplyPurpose,
        result: Result<TextReply, ServiceError>,
    },
    FeedbackReady {
        epoch: u64,
        result: Result<TextReply, ServiceError>,
    },
    CountdownTick { generation: u64 },
    /// Delayed completion after a closing reply.
    AutoComplete { epoch: u64 },
    /// Second transcript clear after a reset.
    DeferredClear { epoch: u64 },
}

impl Action {
    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Action::RequestProblem { .. } => "request_problem",
            Action::ChooseLanguage(_) => "choose_language",
            Action::SendMessage { .. } => "send_message",
            Action::ChangeLanguage(_) => "change_language",
            Action::EditCode(_) => "edit_code",
            Action::EvaluateCode => "evaluate_code",
            Action::CompleteInterview => "complete_interview",
            Action::GenerateFeedback => "generate_feedback",
            Action::Reset => "reset",
            Action::SelectRelatedProblem { .. } => "select_related_problem",
            Action::ProblemLoaded { .. } => "problem_loaded",
            Action::AssistantReplied { .. } => "assistant_replied",
            Action::FeedbackReady { .. } => "feedback_ready",
            Action::CountdownTick { .. } => "countdown_tick",
            Action::AutoComplete { .. } => "auto_complete",
            Action::DeferredClear { .. } => "deferred_clear",
        }
    }
}
