//! Error types for the user system
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UserError {
    #[error("Username not exists: {username}")]
    UserNotFound { username: String },

    #[error("Username already in use: {username}")]
    UsernameAlreadyExists { username: String },

    #[error("Password incorrect")]
    InvalidPassword,

    #[error("Illegal registration form: {reason}")]
    InvalidRegistration { reason: String },

    #[error("Illegal login form: {reason}")]
    InvalidCredentials { reason: String },
}

impl UserError {
    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, UserError::UserNotFound { .. })
    }

    /// Check if this error indicates the username is taken.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, UserError::UsernameAlreadyExists { .. })
    }

    /// Check if this error is a credential mismatch on login.
    pub fn is_authentication_error(&self) -> bool {
        matches!(
            self,
            UserError::UserNotFound { .. } | UserError::InvalidPassword
        )
    }

    /// Check if this error comes from a malformed form.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            UserError::InvalidRegistration { .. } | UserError::InvalidCredentials { .. }
        )
    }
}

impl From<UserError> for crate::Error {
    fn from(err: UserError) -> Self {
        crate::Error::User(err)
    }
}
