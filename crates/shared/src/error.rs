use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error record pushed by the stream server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEvent {
    pub message: String,
}

impl ErrorEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("upstream error: {message}")]
pub struct UpstreamError {
    pub message: String,
}

impl From<ErrorEvent> for UpstreamError {
    fn from(value: ErrorEvent) -> Self {
        Self {
            message: value.message,
        }
    }
}
