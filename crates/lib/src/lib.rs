//!
//! todolist: a multi-user to-do list backend.
//! This library provides the in-memory data layer and the HTTP request layer built on it.
//!
//! ## Core Concepts
//!
//! * **Items (`item::ItemCollection`)**: Each user owns an ordered mapping from integer id to to-do item. The collection assigns ids through a cursor that never rewinds, so auto-assigned ids are never reused.
//! * **Commands (`item::ItemCommand`)**: Item-mutation requests are validated once at the boundary into typed commands. The command layer is strict (adding at a live id is rejected); the collection underneath is permissive.
//! * **Users (`user::UserStore`)**: Username-keyed records holding credentials, display name, the current session token and the item collection.
//! * **Sessions (`session::SessionManager`)**: Cookie tokens with a fixed server-side lifetime. Each user has at most one live session; creating a new one invalidates the old one and cancels its expiry timer.
//! * **Server (`server::TodoServer`)**: axum routes for registration, login and item CRUD, plus a start/stop handle that reinitialises all state on every start.

pub mod constants;
pub mod entropy;
pub mod item;
pub mod server;
pub mod session;
pub mod user;

pub use entropy::{EntropySource, OsEntropy};
#[cfg(any(test, feature = "testing"))]
pub use entropy::{FailingEntropy, FixedEntropy};
pub use item::{Item, ItemCollection, ItemCommand, ItemError, ItemId};
pub use server::{ServerError, TodoServer};
pub use session::{SessionConfig, SessionError, SessionManager, SessionToken};
pub use user::{Credentials, Registration, UserError, UserRecord, UserStore};

/// Result type used throughout the todolist library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the todolist library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Structured item errors from the item module
    #[error(transparent)]
    Item(item::ItemError),

    /// Structured user errors from the user module
    #[error(transparent)]
    User(user::UserError),

    /// Structured session errors from the session module
    #[error(transparent)]
    Session(session::SessionError),

    /// Structured server errors from the server module
    #[error(transparent)]
    Server(server::ServerError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Io(_) => "io",
            Error::Item(_) => "item",
            Error::User(_) => "user",
            Error::Session(_) => "session",
            Error::Server(_) => "server",
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::User(user_err) => user_err.is_not_found(),
            Error::Item(item_err) => item_err.is_invalid_id(),
            Error::Session(session_err) => session_err.is_not_authenticated(),
            _ => false,
        }
    }

    /// Check if this error indicates a conflict (already exists).
    pub fn is_conflict(&self) -> bool {
        match self {
            Error::User(user_err) => user_err.is_already_exists(),
            Error::Item(item_err) => item_err.is_already_exists(),
            _ => false,
        }
    }

    /// Check if this error is authentication-related.
    pub fn is_authentication_error(&self) -> bool {
        match self {
            Error::User(user_err) => user_err.is_authentication_error(),
            Error::Session(session_err) => session_err.is_not_authenticated(),
            _ => false,
        }
    }

    /// Check if this error is validation-related.
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::User(user_err) => user_err.is_validation_error(),
            Error::Item(item_err) => item_err.is_validation_error(),
            Error::Session(session_err) => session_err.is_invalid_timeout(),
            _ => false,
        }
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Error::Io(_))
    }
}
