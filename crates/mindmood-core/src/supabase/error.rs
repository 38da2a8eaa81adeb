//! Error types for the backend client.
//!
//! `ClientError` is what every facade call returns. `AuthError` is the
//! coarser form-level view the sign-in screen branches on.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Maximum number of characters of a raw error body kept in a message.
const MAX_BODY_CHARS: usize = 200;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Missing required setting {0}")]
    MissingSetting(&'static str),

    #[error("Invalid backend URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Request to backend failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to decode backend response: {0}")]
    Decode(String),

    #[error("Session store error: {0}")]
    SessionStore(String),

    #[error("Not signed in")]
    NoSession,

    #[error("Session detection from redirect URLs is disabled")]
    UrlSessionDetectionDisabled,

    #[error("Refusing to {0} without a filter")]
    UnfilteredWrite(&'static str),
}

impl ClientError {
    /// Builds an `Api` error from a non-success response body.
    ///
    /// Understands the error envelopes of both the auth service
    /// (`msg` / `error_description` / `error`) and the data API (`message`).
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        Self::Api {
            status: status.as_u16(),
            message: extract_message(body)
                .unwrap_or_else(|| fallback_message(status, body)),
        }
    }

    /// True when the backend understood the request and said no.
    pub fn is_rejection(&self) -> bool {
        match self {
            Self::Api { status, .. } => matches!(status, 400 | 401 | 403 | 422),
            Self::NoSession => true,
            _ => false,
        }
    }

    /// True when the request never reached the backend or its answer was unusable.
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Http(_) | Self::Decode(_) => true,
            Self::Api { status, .. } => !matches!(status, 400 | 401 | 403 | 422),
            _ => false,
        }
    }
}

fn extract_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(ToString::to_string)
}

fn fallback_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }
    body.chars().take(MAX_BODY_CHARS).collect()
}

/// Form-level outcome of a failed authentication attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The backend refused the credentials or the request.
    #[error("{0}")]
    Rejected(String),
    /// The backend could not be reached or did not answer in time.
    #[error("{0}")]
    Unreachable(String),
    /// A local failure, such as the session file not being writable.
    #[error("{0}")]
    Local(String),
}

impl AuthError {
    pub fn message(&self) -> &str {
        match self {
            Self::Rejected(m) | Self::Unreachable(m) | Self::Local(m) => m,
        }
    }
}

impl From<ClientError> for AuthError {
    fn from(err: ClientError) -> Self {
        if err.is_rejection() {
            let message = match err {
                ClientError::Api { message, .. } => message,
                other => other.to_string(),
            };
            return Self::Rejected(message);
        }
        if !err.is_transport() {
            return Self::Local(err.to_string());
        }

        let message = match &err {
            ClientError::Http(e) if e.is_timeout() => "The server took too long to respond".into(),
            ClientError::Http(_) => "Unable to reach the server. Check your connection.".into(),
            ClientError::Api { status, message } => {
                format!("Server error (HTTP {status}): {message}")
            }
            other => other.to_string(),
        };
        Self::Unreachable(message)
    }
}
