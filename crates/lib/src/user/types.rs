//! Core data types for the user system

use serde::Deserialize;
use serde_json::Value;

use super::UserError;
use crate::{item::ItemCollection, session::SessionToken};

/// One registered user.
///
/// Records are created on registration and live until the store is reset.
/// `current_session` is only ever written by the session manager, and is
/// cleared exactly when the session it names is invalidated.
#[derive(Clone)]
pub struct UserRecord {
    /// Unique, non-empty login name
    pub username: String,

    /// Display name, may be empty
    pub fullname: String,

    /// Compared by exact equality
    pub(crate) password: String,

    /// Token of the one live session for this user, if any
    pub(crate) current_session: Option<SessionToken>,

    /// The user's to-do items
    pub items: ItemCollection,
}

impl UserRecord {
    pub(crate) fn new(registration: Registration) -> Self {
        Self {
            username: registration.username,
            fullname: registration.fullname,
            password: registration.password,
            current_session: None,
            items: ItemCollection::new(),
        }
    }

    /// Token of the currently active session.
    pub fn current_session(&self) -> Option<&SessionToken> {
        self.current_session.as_ref()
    }

    pub(crate) fn password_matches(&self, password: &str) -> bool {
        self.password == password
    }
}

impl std::fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserRecord")
            .field("username", &self.username)
            .field("fullname", &self.fullname)
            .field("current_session", &self.current_session)
            .field("items", &self.items.len())
            .finish_non_exhaustive()
    }
}

/// Validated registration data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    pub username: String,
    pub fullname: String,
    pub password: String,
}

impl Registration {
    /// Build registration data, rejecting an empty username or password.
    pub fn new(
        username: impl Into<String>,
        fullname: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, UserError> {
        let credentials = Credentials::new(username, password).map_err(|e| match e {
            UserError::InvalidCredentials { reason } => UserError::InvalidRegistration { reason },
            other => other,
        })?;
        Ok(Self {
            username: credentials.username,
            fullname: fullname.into(),
            password: credentials.password,
        })
    }
}

/// Validated login data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Build login data, rejecting an empty username or password.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, UserError> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() {
            return Err(UserError::InvalidCredentials {
                reason: "empty username".to_string(),
            });
        }
        if password.is_empty() {
            return Err(UserError::InvalidCredentials {
                reason: "empty password".to_string(),
            });
        }
        Ok(Self { username, password })
    }
}

/// Body of a registration request: `{username, fullname, password}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<Value>,
    pub fullname: Option<Value>,
    pub password: Option<Value>,
}

/// Body of a login request: `{username, password}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<Value>,
    pub password: Option<Value>,
}

fn string_field(value: Option<Value>, field: &str) -> Result<String, String> {
    match value {
        Some(Value::String(s)) => Ok(s),
        _ => Err(format!("{field} must be a string")),
    }
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = UserError;

    fn try_from(request: RegisterRequest) -> Result<Self, Self::Error> {
        let invalid = |reason: String| UserError::InvalidRegistration { reason };
        let username = string_field(request.username, "username").map_err(invalid)?;
        let password = string_field(request.password, "password").map_err(invalid)?;
        let fullname = string_field(request.fullname, "fullname").map_err(invalid)?;
        Registration::new(username, fullname, password)
    }
}

impl TryFrom<LoginRequest> for Credentials {
    type Error = UserError;

    fn try_from(request: LoginRequest) -> Result<Self, Self::Error> {
        let invalid = |reason: String| UserError::InvalidCredentials { reason };
        let username = string_field(request.username, "username").map_err(invalid)?;
        let password = string_field(request.password, "password").map_err(invalid)?;
        Credentials::new(username, password)
    }
}
