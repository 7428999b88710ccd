//! Error types for the HTTP server handle.

use thiserror::Error;

/// Errors that can occur while starting or stopping the server.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ServerError {
    /// Attempted to start a server when one is already running.
    #[error("Server already running on {address}")]
    AlreadyRunning { address: String },

    /// Attempted to stop a server when none is running.
    #[error("Server not running")]
    NotRunning,

    /// Server bind error.
    #[error("Failed to bind server to {address}: {reason}")]
    Bind { address: String, reason: String },
}

impl ServerError {
    /// Check if this error is about the server's running state.
    pub fn is_state_error(&self) -> bool {
        matches!(
            self,
            ServerError::AlreadyRunning { .. } | ServerError::NotRunning
        )
    }
}

impl From<ServerError> for crate::Error {
    fn from(err: ServerError) -> Self {
        crate::Error::Server(err)
    }
}
