//! Error types for dashboard state and backend access.

use thiserror::Error;

/// Errors that can occur while talking to the backend or managing state.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// The backend rejected the access token (HTTP 401).
    #[error("unauthorized")]
    Unauthorized,

    /// The session could not be refreshed; the user must log in again.
    #[error("session expired")]
    SessionExpired,

    /// The backend answered with a non-success status.
    #[error("backend error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body or reason.
        message: String,
    },

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// A payload could not be encoded or decoded.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The backend answered with a payload of the wrong shape.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid backend URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl DashboardError {
    /// Returns true if the user has to authenticate again.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, DashboardError::Unauthorized | DashboardError::SessionExpired)
    }
}

/// Result type for dashboard operations.
pub type DashboardResult<T> = std::result::Result<T, DashboardError>;
