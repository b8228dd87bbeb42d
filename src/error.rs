use axum::response::{IntoResponse, Response};
use http::StatusCode;
use thiserror::Error;

use crate::joke::JokeError;
use crate::render::RenderError;
use crate::util::error_response;

/// Infrastructure failures that abort a request.
///
/// User input problems never reach this type; handlers render those through
/// the failure envelope instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Joke(#[from] JokeError),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Render(RenderError::Template { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Joke(JokeError::MissingCredential) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Joke(JokeError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Joke(
                JokeError::Transport(_)
                | JokeError::Status { .. }
                | JokeError::Malformed(_)
                | JokeError::EmptyChoices,
            ) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Message returned to the caller. Upstream bodies and filesystem paths
    /// stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AppError::Render(_) => "response template unavailable".to_string(),
            AppError::Joke(JokeError::Timeout(_)) => "upstream unavailable".to_string(),
            AppError::Joke(JokeError::MissingCredential) => {
                "upstream credential is not configured".to_string()
            }
            AppError::Joke(JokeError::Transport(_)) => "upstream unavailable".to_string(),
            AppError::Joke(JokeError::Status { status, .. }) => {
                format!("upstream returned status {status}")
            }
            AppError::Joke(JokeError::Malformed(_) | JokeError::EmptyChoices) => {
                "upstream returned an invalid response".to_string()
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Joke(JokeError::Status { status: upstream, body }) => {
                tracing::error!(upstream_status = upstream, upstream_body = %body, "joke upstream rejected request");
            }
            other => tracing::error!(error = %other, status = status.as_u16(), "request failed"),
        }
        error_response(status, &self.public_message())
    }
}
