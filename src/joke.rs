//! Outbound chat-completion call behind `/random-joke`.
//!
//! One POST per request, no retry. Every failure mode maps to a distinct
//! [`JokeError`] variant so the HTTP layer can pick a status code.

use std::time::Duration;

use async_trait::async_trait;
use http::header;
use thiserror::Error;

use crate::config::JokeConfig;
use crate::models::chat::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

#[derive(Debug, Error)]
pub enum JokeError {
    #[error("upstream credential is not configured (set OPENAI_API_KEY)")]
    MissingCredential,
    #[error("upstream did not answer within {0:?}")]
    Timeout(Duration),
    #[error("upstream request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("upstream returned status {status}")]
    Status { status: u16, body: String },
    #[error("upstream response body is not a chat completion: {0}")]
    Malformed(#[source] serde_json::Error),
    #[error("upstream response contained no message content")]
    EmptyChoices,
}

/// Anything that can produce a joke. The server only sees this trait.
#[async_trait]
pub trait JokeSource: Send + Sync {
    async fn fetch_joke(&self) -> Result<String, JokeError>;
}

/// Chat Completions client for the configured upstream.
pub struct HttpJokeClient {
    http: reqwest::Client,
    config: JokeConfig,
}

impl HttpJokeClient {
    pub fn new(http: reqwest::Client, config: JokeConfig) -> Self {
        Self { http, config }
    }

    pub fn request_body(&self) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(self.config.prompt.clone())],
            max_tokens: Some(self.config.max_tokens),
        }
    }

    fn classify(&self, err: reqwest::Error) -> JokeError {
        if err.is_timeout() {
            JokeError::Timeout(self.config.timeout)
        } else {
            JokeError::Transport(err)
        }
    }
}

#[async_trait]
impl JokeSource for HttpJokeClient {
    async fn fetch_joke(&self) -> Result<String, JokeError> {
        let key = self
            .config
            .api_key
            .as_ref()
            .ok_or(JokeError::MissingCredential)?;
        let url = self.config.completions_url();

        tracing::debug!(url = %url, model = %self.config.model, "requesting joke from upstream");

        let resp = self
            .http
            .post(&url)
            .header(header::CONTENT_TYPE, "application/json")
            .bearer_auth(key.expose())
            .timeout(self.config.timeout)
            .json(&self.request_body())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.classify(e))?;
        tracing::debug!(status = status.as_u16(), body = %text, "upstream response");

        if !status.is_success() {
            return Err(JokeError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(JokeError::Malformed)?;
        parsed
            .first_content()
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .ok_or(JokeError::EmptyChoices)
    }
}
