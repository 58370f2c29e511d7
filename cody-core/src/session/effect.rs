//! Effects produced by state transitions

use std::time::Duration;

use super::event::ReplyPurpose;
use crate::types::Message;

/// Message sent to the service on reset so it drops its own history.
pub const RESET_NOTICE: &str = "stop session and clear the memory";

/// Side effects to be executed by the runtime after a transition.
///
/// Network effects from one transition run in order on a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch a problem; answers with `Action::ProblemLoaded`.
    LoadProblem { epoch: u64, text: String },

    /// Tell the service the active language (display name). Failures are only logged.
    SetLanguage { language: String },

    /// Send a chat turn; answers with `Action::AssistantReplied`.
    Ask {
        epoch: u64,
        message: String,
        language: Option<String>,
        purpose: ReplyPurpose,
    },

    /// Request the feedback report; answers with `Action::FeedbackReady`.
    Summarize {
        epoch: u64,
        chat_history: Vec<Message>,
        problem_title: String,
    },

    /// Fire-and-forget [`RESET_NOTICE`]. The reply is discarded.
    NotifyReset,

    /// Start the per-second tick task, replacing any running one.
    StartCountdown { generation: u64, seconds: u32 },

    /// Abort the tick task.
    StopCountdown,

    /// Send `Action::AutoComplete` after `delay`.
    ScheduleCompletion { delay: Duration, epoch: u64 },

    /// Send `Action::DeferredClear` after `delay`.
    ScheduleTranscriptClear { delay: Duration, epoch: u64 },

    /// Show a warning to the user. No state changed.
    Warn(String),
}

impl Effect {
    pub fn warn(message: impl Into<String>) -> Self {
        Effect::Warn(message.into())
    }
}
