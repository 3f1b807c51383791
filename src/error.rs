use thiserror::Error;

use crate::domain::FieldKey;

/// Typed-field misuse when editing a form.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error("field {0} takes a text value")]
    ExpectedText(FieldKey),
    #[error("field {0} takes a flag value")]
    ExpectedFlag(FieldKey),
}

/// Failure talking to the remote users API.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The server answered with a non-success status. `body` holds the decoded
    /// error payload, or `Value::Null` when the response carried none.
    #[error("server rejected request (status {status})")]
    Rejected { status: u16, body: serde_json::Value },
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// The server-provided `detail` message, when the error payload has one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { body, .. } => body.get("detail").and_then(|v| v.as_str()),
            ApiError::Transport(_) => None,
        }
    }
}

/// Failure reading or writing the local session store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    #[error("session store io error: {0}")]
    Io(String),
    #[error("session store holds malformed data: {0}")]
    Malformed(String),
}

/// Failure loading or saving the client configuration file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("config io error: {0}")]
    Io(String),
    #[error("config file is malformed: {0}")]
    Malformed(String),
}

/// Failure communicating with a screen task.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScreenError {
    #[error(transparent)]
    Form(#[from] FormError),
    #[error("screen unavailable: {0}")]
    Unavailable(String),
}
