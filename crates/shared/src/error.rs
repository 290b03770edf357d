use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Authority-reported error payload. Surfaced verbatim in the client's
/// inline error region; never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{message}")]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
