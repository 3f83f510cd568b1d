//! Client error types

use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use tokio_tungstenite::tungstenite;

/// Errors raised while talking to the remote chat service
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("WebSocket error: {0}")]
    WebSocket(#[source] Box<tungstenite::Error>),

    #[error("Malformed realtime frame: {0}")]
    MalformedFrame(#[source] serde_json::Error),

    #[error("Realtime socket closed before a session was issued")]
    SocketClosed,

    #[error("No session received within {0:?}")]
    SessionTimeout(Duration),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with {status}: {message}")]
    Http {
        status: StatusCode,
        message: String,
        body: Option<Value>,
    },

    #[error("Failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Response is missing `{0}`")]
    MissingField(&'static str),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

impl From<tungstenite::Error> for ClientError {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(Box::new(err))
    }
}

impl ClientError {
    /// Build an HTTP error from a non-2xx status and its raw body
    #[must_use]
    pub fn http(status: StatusCode, raw_body: &str) -> Self {
        let body = serde_json::from_str::<Value>(raw_body).ok();
        let message = body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(Value::as_str)
            .map_or_else(
                || {
                    if raw_body.is_empty() {
                        status
                            .canonical_reason()
                            .unwrap_or("no response body")
                            .to_string()
                    } else {
                        raw_body.to_string()
                    }
                },
                str::to_string,
            );

        Self::Http {
            status,
            message,
            body,
        }
    }

    /// HTTP status of a rejected request
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// True when the server answered and refused the request
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    /// Error payload sent by the server, if any
    #[must_use]
    pub fn server_body(&self) -> Option<&Value> {
        match self {
            Self::Http { body, .. } => body.as_ref(),
            _ => None,
        }
    }
}

/// Result type alias for client operations
pub type ClientResult<T> = Result<T, ClientError>;
