//! Plain data types shared by the session, the service client, and the UI.
//!
//! All types are fully owned so they can cross the runtime's task boundary and
//! be stored in the session without lifetimes.

use serde::{Deserialize, Serialize};

/// Author of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One chat turn. Serialises as `{ "role": "user", "content": "..." }`, which is
/// also the shape the summarize endpoint expects in `chat_history`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The problem currently being interviewed on.
///
/// `description` is whatever the service returned, usually HTML. Stripping
/// markup is a rendering concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// A follow-up problem recommended in the feedback report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedProblem {
    /// Numeric problem identifier as written in the report (e.g. `"1"`).
    pub id: String,
    pub title: String,
}

/// Which screen the session is showing.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// One-time detour to pick a language before the first problem loads.
    LanguageSelect,
    /// Chat, problem and code editor (default).
    #[default]
    Interview,
    /// Generated report plus related problems.
    Feedback,
}
