//! Error types for the API boundary.
//!
//! Every failure a user action can hit is collapsed into a single
//! human-readable message via `Display`. Callers surface the message inline
//! next to the form or list that triggered it; nothing panics the view.

use thiserror::Error;

/// Errors from talking to the portfolio REST API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The credential probe was rejected at login.
    #[error("Invalid credentials. Check your username and password.")]
    Unauthorized,

    /// The request failed at the transport level (DNS, TLS, connect, read).
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The collaborator answered with a non-success status. `message` is the
    /// normalized error body (its `detail` field when present).
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// True when the failure came back from the collaborator rather than the
    /// transport, e.g. a validation rejection on a malformed field.
    pub fn is_rejection(&self) -> bool {
        matches!(self, ApiError::Rejected { .. })
    }

    /// Status code of a collaborator rejection, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
