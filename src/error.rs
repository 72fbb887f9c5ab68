//! Error taxonomy for remote operations.
//!
//! Every failure of a load/create/update/delete call falls into one of these
//! categories; callers turn them into a single user-visible message and the
//! local collection state is never mutated on a failed write.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure: the request never produced a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The server answered successfully but the body was not decodable.
    #[error("unreadable server response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A required local field was missing or malformed; no request was made.
    #[error("invalid input: {0}")]
    Validation(String),
}

impl ApiError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        ApiError::Rejected {
            status,
            message: message.into(),
        }
    }
}
