//! API error taxonomy.

use thiserror::Error;

use crate::domain::error::DomainError;

/// Failure modes surfaced by queries and mutations.
///
/// The enum is `Clone` because a read failure lives on in the cached
/// snapshot (`QueryState::Error`) while also being returned to the caller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The request never completed (connect, timeout, broken body).
    #[error("transport error: {message}")]
    Transport { message: String },
    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
    /// The response body did not match the expected shape.
    #[error("response decode failed: {message}")]
    Decode { message: String },
    /// The input was rejected before any network or cache work.
    #[error("invalid input: {message}")]
    Validation { message: String },
}

impl ApiError {
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Status {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// True for failures the optimistic rollback protocol applies to:
    /// the mutation was dispatched but did not succeed on the server.
    pub fn is_network_failure(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. } | Self::Decode { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode {
                message: err.to_string(),
            }
        } else {
            Self::Transport {
                message: err.to_string(),
            }
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { message } => Self::Validation { message },
        }
    }
}
