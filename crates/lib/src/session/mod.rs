//! Session tokens, the session table and the session manager.
//!
//! A session maps an opaque token to a username and lives for a fixed
//! timeout from creation. Each session owns a scheduled expiry task; dropping
//! the [`Session`] cancels that task, so removing an entry from the
//! [`SessionTable`] (or clearing it) always cancels the matching timer.
//! Expiry itself is the same invalidation routine as any other removal and is
//! keyed strictly by token, which makes it idempotent.

use std::{borrow::Borrow, collections::HashMap, fmt, time::Duration};

use tokio::{task::AbortHandle, time::Instant};

use crate::{
    constants::{MAX_SESSION_TIMEOUT_SECS, SESSION_TIMEOUT, TOKEN_BYTES},
    entropy::EntropySource,
};

pub mod errors;
pub mod manager;

pub use errors::SessionError;
pub use manager::SessionManager;

/// Session configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Lifetime of a session from creation. Not extended on use.
    pub timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: SESSION_TIMEOUT,
        }
    }
}

impl SessionConfig {
    /// Build a config, accepting any non-zero timeout up to
    /// [`MAX_SESSION_TIMEOUT_SECS`].
    pub fn new(timeout: Duration) -> Result<Self, SessionError> {
        if timeout.is_zero() || timeout.as_secs() > MAX_SESSION_TIMEOUT_SECS {
            return Err(SessionError::InvalidTimeout {
                seconds: timeout.as_secs(),
            });
        }
        Ok(Self { timeout })
    }
}

/// Opaque, unguessable session identifier, rendered as fixed-length hex.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    /// Mint a token from `TOKEN_BYTES` bytes of the given entropy source.
    pub fn generate(entropy: &dyn EntropySource) -> Result<Self, SessionError> {
        let mut bytes = [0u8; TOKEN_BYTES];
        entropy.fill(&mut bytes)?;
        Ok(Self(hex::encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Only a prefix is shown so tokens don't end up whole in logs.
impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = self.0.get(..8).unwrap_or(&self.0);
        write!(f, "SessionToken({prefix}..)")
    }
}

impl Borrow<str> for SessionToken {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for SessionToken {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// One live login.
#[derive(Debug)]
pub struct Session {
    token: SessionToken,
    username: String,
    expires_at: Instant,
    expiry: Option<AbortHandle>,
}

impl Session {
    /// Create a session whose pending expiry task is `expiry`.
    pub fn new(
        token: SessionToken,
        username: impl Into<String>,
        expires_at: Instant,
        expiry: Option<AbortHandle>,
    ) -> Self {
        Self {
            token,
            username: username.into(),
            expires_at,
            expiry,
        }
    }

    pub fn token(&self) -> &SessionToken {
        &self.token
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Whether the deadline has passed at `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(expiry) = self.expiry.take() {
            expiry.abort();
        }
    }
}

/// Mapping from token to [`Session`].
#[derive(Debug, Default)]
pub struct SessionTable {
    sessions: HashMap<SessionToken, Session>,
}

impl SessionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a session, replacing (and cancelling) any entry with the same token.
    pub fn insert(&mut self, session: Session) {
        self.sessions.insert(session.token.clone(), session);
    }

    pub fn get(&self, token: &str) -> Option<&Session> {
        self.sessions.get(token)
    }

    /// Remove a session. Its expiry task is cancelled when the value is dropped.
    pub fn remove(&mut self, token: &str) -> Option<Session> {
        self.sessions.remove(token)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Cancel every pending expiry and drop all sessions, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.sessions.len();
        self.sessions.clear();
        count
    }
}
