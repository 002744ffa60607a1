use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ClientError {
    /// The server answered with a non-success status.
    #[error("request failed ({status})")]
    Status { status: StatusCode, body: String },
    /// The server could not be reached.
    #[error("network error: {0}")]
    Network(String),
    /// The server answered but the body was not the expected JSON.
    #[error("parsing error: {0}")]
    Parsing(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Server,
    Network,
    Parsing,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Status { status, .. } if *status == StatusCode::BAD_REQUEST => ErrorKind::Validation,
            ClientError::Status { status, .. } if *status == StatusCode::NOT_FOUND => ErrorKind::NotFound,
            ClientError::Status { .. } => ErrorKind::Server,
            ClientError::Network(_) => ErrorKind::Network,
            ClientError::Parsing(_) => ErrorKind::Parsing,
        }
    }

    /// Text suitable for a notification.
    ///
    /// Prefers the body's `message`, then `error`, then a plain-text body,
    /// and otherwise a generic line for the failure kind.
    pub fn message(&self) -> String {
        match self {
            ClientError::Status { status, body } => {
                if let Ok(parsed) = serde_json::from_str::<ErrorBody>(body) {
                    if let Some(text) = non_blank(parsed.message).or_else(|| non_blank(parsed.error)) {
                        return text;
                    }
                } else if serde_json::from_str::<serde_json::Value>(body).is_err() && !body.trim().is_empty() {
                    return body.trim().to_string();
                }
                format!("Request failed ({})", status.as_u16())
            }
            ClientError::Network(_) => "Network error. Is the server running?".to_string(),
            ClientError::Parsing(_) => "Received an invalid response from the server.".to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            ClientError::Parsing(error.to_string())
        } else {
            ClientError::Network(error.to_string())
        }
    }
}
