//! Interview service contract and its HTTP implementation.
//!
//! The assistant lives behind four JSON endpoints. [`InterviewService`] is the
//! seam the runtime talks to, so tests can swap in a scripted implementation;
//! [`HttpInterviewService`] is the real thing.
//!
//! Replies are decoded into loose structs with every field optional. Deciding
//! what an absent or empty field means (fallback strings, diagnostics) is the
//! state machine's job, not the client's.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{Message, Problem};

/// Failure to get a decodable reply out of the service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Connection refused, timeout, or the body could not be read.
    #[error("service unreachable: {0}")]
    Transport(String),
    /// The body was not the JSON we expected.
    #[error("malformed service reply: {0}")]
    Decode(String),
}

/// Reply from `POST /problem`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProblemReply {
    #[serde(default)]
    pub problem: Option<Problem>,
    #[serde(default)]
    pub raw: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Reply from `POST /ask` and `POST /summarize`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TextReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl TextReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
            error: None,
        }
    }

    pub fn error(error: impl Into<String>) -> Self {
        Self {
            response: None,
            error: Some(error.into()),
        }
    }

    /// The `response` field, if present and non-empty.
    pub fn response_text(&self) -> Option<&str> {
        non_empty(self.response.as_deref())
    }

    /// The `error` field, if present and non-empty.
    pub fn error_text(&self) -> Option<&str> {
        non_empty(self.error.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|s| !s.is_empty())
}

#[derive(Debug, Serialize)]
struct ProblemRequest<'a> {
    problem_description: &'a str,
}

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct LanguageRequest<'a> {
    language: &'a str,
}

#[derive(Debug, Serialize)]
struct SummarizeRequest<'a> {
    chat_history: &'a [Message],
    problem_title: &'a str,
}

/// The remote assistant, as seen by the runtime.
#[async_trait]
pub trait InterviewService: Send + Sync {
    /// Fetches a problem by id or URL.
    async fn load_problem(&self, problem_description: &str) -> Result<ProblemReply, ServiceError>;

    /// Sends one chat turn. `language` is a display name such as `"C++"`.
    async fn ask(&self, message: &str, language: Option<&str>) -> Result<TextReply, ServiceError>;

    /// Tells the service which language the candidate is using. Best effort.
    async fn set_language(&self, language: &str) -> Result<(), ServiceError>;

    /// Requests the feedback report for a finished interview.
    async fn summarize(
        &self,
        chat_history: &[Message],
        problem_title: &str,
    ) -> Result<TextReply, ServiceError>;
}

#[async_trait]
impl<T: InterviewService + ?Sized> InterviewService for Arc<T> {
    async fn load_problem(&self, problem_description: &str) -> Result<ProblemReply, ServiceError> {
        (**self).load_problem(problem_description).await
    }

    async fn ask(&self, message: &str, language: Option<&str>) -> Result<TextReply, ServiceError> {
        (**self).ask(message, language).await
    }

    async fn set_language(&self, language: &str) -> Result<(), ServiceError> {
        (**self).set_language(language).await
    }

    async fn summarize(
        &self,
        chat_history: &[Message],
        problem_title: &str,
    ) -> Result<TextReply, ServiceError> {
        (**self).summarize(chat_history, problem_title).await
    }
}

/// `reqwest`-backed service client.
pub struct HttpInterviewService {
    client: Client,
    base_url: String,
}

impl HttpInterviewService {
    /// Builds a client for the service at `base_url` (e.g. `http://localhost:8000`).
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Transport` if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        let base_url = base_url.trim_end_matches('/').to_owned();
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// POSTs `body` as JSON and decodes the reply body regardless of status.
    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ServiceError>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = self.endpoint(path);
        tracing::debug!(endpoint = %url, "POST");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::warn!(endpoint = %url, %status, error = %e, "undecodable reply");
            ServiceError::Decode(e.to_string())
        })
    }
}

#[async_trait]
impl InterviewService for HttpInterviewService {
    async fn load_problem(&self, problem_description: &str) -> Result<ProblemReply, ServiceError> {
        let body = ProblemRequest {
            problem_description,
        };
        self.post("problem", &body).await
    }

    async fn ask(&self, message: &str, language: Option<&str>) -> Result<TextReply, ServiceError> {
        self.post("ask", &AskRequest { message, language }).await
    }

    async fn set_language(&self, language: &str) -> Result<(), ServiceError> {
        self.client
            .post(self.endpoint("set-language"))
            .json(&LanguageRequest { language })
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.to_string()))?;
        Ok(())
    }

    async fn summarize(
        &self,
        chat_history: &[Message],
        problem_title: &str,
    ) -> Result<TextReply, ServiceError> {
        let body = SummarizeRequest {
            chat_history,
            problem_title,
        };
        self.post("summarize", &body).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ask_request_omits_absent_language() {
        let request = AskRequest {
            message: "hi",
            language: Some("Go"),
        };
        let with = serde_json::to_value(request).unwrap();
        assert_eq!(with, json!({ "message": "hi", "language": "Go" }));
        let request = AskRequest {
            message: "hi",
            language: None,
        };
        let without = serde_json::to_value(request).unwrap();
        assert_eq!(without, json!({ "message": "hi" }));
    }

    #[test]
    fn summarize_request_carries_roles_in_lowercase() {
        let history = [Message::user("hello"), Message::assistant("hi there")];
        let value = serde_json::to_value(SummarizeRequest {
            chat_history: &history,
            problem_title: "Two Sum",
        })
        .unwrap();
        assert_eq!(
            value,
            json!({
                "chat_history": [
                    { "role": "user", "content": "hello" },
                    { "role": "assistant", "content": "hi there" }
                ],
                "problem_title": "Two Sum"
            })
        );
    }

    #[test]
    fn problem_reply_accepts_each_documented_shape() {
        let full: ProblemReply = serde_json::from_value(json!({
            "problem": { "title": "Valid Anagram", "description": "<p>x</p>" },
            "raw": "<p>x</p>"
        }))
        .unwrap();
        assert_eq!(full.problem.unwrap().title, "Valid Anagram");

        let raw_only: ProblemReply = serde_json::from_value(json!({ "raw": "text" })).unwrap();
        assert!(raw_only.problem.is_none());
        assert_eq!(raw_only.raw.as_deref(), Some("text"));

        let failed: ProblemReply =
            serde_json::from_value(json!({ "error": "Invalid LeetCode URL format" })).unwrap();
        assert_eq!(failed.error.as_deref(), Some("Invalid LeetCode URL format"));
    }

    #[test]
    fn empty_strings_count_as_absent() {
        let reply = TextReply {
            response: Some(String::new()),
            error: Some("boom".into()),
        };
        assert_eq!(reply.response_text(), None);
        assert_eq!(reply.error_text(), Some("boom"));
    }

    #[test]
    fn base_url_trailing_slash_is_normalised() {
        let service =
            HttpInterviewService::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(service.endpoint("ask"), "http://localhost:8000/ask");
    }
}
