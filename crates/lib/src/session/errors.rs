//! Error types for the session system.

use thiserror::Error;

/// Errors that can occur while creating or resolving sessions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    /// The entropy source failed; no session is created.
    #[error("Failed to generate session token: {reason}")]
    TokenGeneration { reason: String },

    /// The configured session timeout cannot be used to compute a deadline.
    #[error("Session timeout of {seconds}s is out of range")]
    InvalidTimeout { seconds: u64 },

    /// The presented token does not name a live session.
    #[error("Not logged in (possibly, your session expired)")]
    NotAuthenticated,
}

impl SessionError {
    /// Check if this error means the caller has no valid session.
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, SessionError::NotAuthenticated)
    }

    /// Check if this error comes from an unusable timeout setting.
    pub fn is_invalid_timeout(&self) -> bool {
        matches!(self, SessionError::InvalidTimeout { .. })
    }

    /// Check if this error comes from the entropy source.
    pub fn is_token_generation(&self) -> bool {
        matches!(self, SessionError::TokenGeneration { .. })
    }
}

impl From<SessionError> for crate::Error {
    fn from(err: SessionError) -> Self {
        crate::Error::Session(err)
    }
}
