//! Session manager coordinating the user store and the session table.
//!
//! All state lives in one [`Registry`] behind a single async mutex, so every
//! operation (including a firing expiry task) observes and leaves the user
//! store and session table consistent with each other. No operation awaits
//! anything but that lock.

use std::{
    collections::BTreeMap,
    sync::{Arc, Weak},
};

use tokio::{
    sync::Mutex,
    time::{Instant, sleep_until},
};
use tracing::{debug, info, warn};

use super::{Session, SessionConfig, SessionError, SessionTable, SessionToken};
use crate::{
    Result,
    entropy::{EntropySource, OsEntropy},
    item::{Item, ItemCommand, ItemId},
    user::{Credentials, Registration, UserError, UserRecord, UserStore},
};

/// Users and sessions, always mutated together.
#[derive(Debug, Default)]
struct Registry {
    users: UserStore,
    sessions: SessionTable,
}

impl Registry {
    /// Remove the session named by `token`, clearing the owner's back-reference
    /// only if it still names this token. Returns whether a session was removed.
    fn invalidate(&mut self, token: &str) -> bool {
        let Some(session) = self.sessions.remove(token) else {
            return false;
        };
        if let Some(user) = self.users.find_mut(session.username())
            && user
                .current_session
                .as_ref()
                .is_some_and(|current| current == token)
        {
            user.current_session = None;
        }
        true
    }

    /// Username owning a live, unexpired session.
    fn resolve(&self, token: &str) -> Option<&str> {
        let session = self.sessions.get(token)?;
        if session.is_expired_at(Instant::now()) {
            return None;
        }
        Some(session.username())
    }

    fn reset(&mut self) -> usize {
        let cancelled = self.sessions.clear();
        self.users.reset();
        cancelled
    }
}

/// Facade over user registration, login and session lifetime.
///
/// Cheap to clone; clones share the same state. The state is owned here and
/// handed to the request layer at startup, not kept in a global.
#[derive(Clone, Debug)]
pub struct SessionManager {
    registry: Arc<Mutex<Registry>>,
    entropy: Arc<dyn EntropySource>,
    config: SessionConfig,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    /// Create a manager with the default timeout and OS entropy.
    pub fn new() -> Self {
        Self::with_config(SessionConfig::default())
    }

    pub fn with_config(config: SessionConfig) -> Self {
        Self::with_entropy(config, Arc::new(OsEntropy))
    }

    /// Create a manager drawing session tokens from `entropy`.
    pub fn with_entropy(config: SessionConfig, entropy: Arc<dyn EntropySource>) -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry::default())),
            entropy,
            config,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Register a new user and open their first session.
    ///
    /// The token and deadline are prepared before the user is inserted, so an
    /// entropy failure or an unusable timeout leaves no half-registered account.
    pub async fn register(&self, registration: Registration) -> Result<SessionToken> {
        let mut registry = self.registry.lock().await;
        if registry.users.find(&registration.username).is_some() {
            return Err(UserError::UsernameAlreadyExists {
                username: registration.username,
            }
            .into());
        }
        let (token, expires_at) = self.prepare_session()?;
        let username = registry.users.register(registration)?.username.clone();
        Ok(self.open_session(&mut registry, &username, token, expires_at))
    }

    /// Check credentials and open a fresh session, replacing any existing one.
    pub async fn login(&self, credentials: Credentials) -> Result<SessionToken> {
        let mut registry = self.registry.lock().await;
        let user = registry.users.find(&credentials.username).ok_or_else(|| {
            UserError::UserNotFound {
                username: credentials.username.clone(),
            }
        })?;
        if !user.password_matches(&credentials.password) {
            warn!(username = %credentials.username, "login rejected: password mismatch");
            return Err(UserError::InvalidPassword.into());
        }
        let (token, expires_at) = self.prepare_session()?;
        Ok(self.open_session(&mut registry, &credentials.username, token, expires_at))
    }

    /// Open a new session for an existing user, invalidating their previous one.
    pub async fn new_session(&self, username: &str) -> Result<SessionToken> {
        let mut registry = self.registry.lock().await;
        if registry.users.find(username).is_none() {
            return Err(UserError::UserNotFound {
                username: username.to_string(),
            }
            .into());
        }
        let (token, expires_at) = self.prepare_session()?;
        Ok(self.open_session(&mut registry, username, token, expires_at))
    }

    /// Mint a token and compute the deadline of a session starting now.
    fn prepare_session(&self) -> Result<(SessionToken, Instant)> {
        let expires_at = Instant::now()
            .checked_add(self.config.timeout)
            .ok_or_else(|| {
                warn!(timeout = ?self.config.timeout, "session deadline out of range");
                SessionError::InvalidTimeout {
                    seconds: self.config.timeout.as_secs(),
                }
            })?;
        let token = SessionToken::generate(self.entropy.as_ref()).map_err(|e| {
            warn!("session token generation failed: {e}");
            e
        })?;
        Ok((token, expires_at))
    }

    /// Install `token` as the user's only session and schedule its expiry.
    ///
    /// The caller has checked that `username` exists.
    fn open_session(
        &self,
        registry: &mut Registry,
        username: &str,
        token: SessionToken,
        expires_at: Instant,
    ) -> SessionToken {
        let previous = registry
            .users
            .find(username)
            .and_then(|user| user.current_session.clone());
        if let Some(previous) = previous {
            registry.invalidate(previous.as_str());
        }
        registry.invalidate(token.as_str());

        let expiry = tokio::spawn(expire_session(
            Arc::downgrade(&self.registry),
            token.clone(),
            expires_at,
        ));
        registry.sessions.insert(Session::new(
            token.clone(),
            username,
            expires_at,
            Some(expiry.abort_handle()),
        ));
        if let Some(user) = registry.users.find_mut(username) {
            user.current_session = Some(token.clone());
        }
        debug!(%username, ?token, "opened session");
        token
    }

    /// Snapshot of the user owning `token`, if the session is live.
    ///
    /// Pure lookup: the deadline is never extended.
    pub async fn resolve(&self, token: &str) -> Option<UserRecord> {
        let registry = self.registry.lock().await;
        let username = registry.resolve(token)?;
        registry.users.find(username).cloned()
    }

    /// Run `f` against the user owning `token`, if the session is live.
    pub async fn with_user<R>(
        &self,
        token: &str,
        f: impl FnOnce(&mut UserRecord) -> R,
    ) -> Option<R> {
        let mut registry = self.registry.lock().await;
        let username = registry.resolve(token)?.to_owned();
        let user = registry.users.find_mut(&username)?;
        Some(f(user))
    }

    /// Apply an item command to the collection of the user owning `token`.
    pub async fn apply(&self, token: &str, command: ItemCommand) -> Result<Option<Item>> {
        self.with_user(token, |user| command.apply(&mut user.items))
            .await
            .ok_or(SessionError::NotAuthenticated)?
            .map_err(Into::into)
    }

    /// Copy of the item mapping of the user owning `token`.
    pub async fn items(&self, token: &str) -> Result<BTreeMap<ItemId, Item>> {
        self.with_user(token, |user| user.items.json_view().clone())
            .await
            .ok_or_else(|| SessionError::NotAuthenticated.into())
    }

    /// Snapshot of a user record by name.
    pub async fn find_user(&self, username: &str) -> Option<UserRecord> {
        self.registry.lock().await.users.find(username).cloned()
    }

    /// Invalidate a session. Idempotent: unknown tokens are ignored.
    pub async fn invalidate(&self, token: &str) -> bool {
        let removed = self.registry.lock().await.invalidate(token);
        if removed {
            debug!("invalidated session");
        }
        removed
    }

    /// Cancel every pending expiry, then drop all sessions and users.
    pub async fn reset(&self) {
        let cancelled = self.registry.lock().await.reset();
        info!(cancelled, "reset user and session store");
    }

    pub async fn session_count(&self) -> usize {
        self.registry.lock().await.sessions.len()
    }

    pub async fn user_count(&self) -> usize {
        self.registry.lock().await.users.len()
    }
}

/// Expiry task: after the deadline, invalidate exactly this token.
///
/// Holds only the token and a weak handle, so a torn-down registry or an
/// already-removed session both make this a no-op.
async fn expire_session(registry: Weak<Mutex<Registry>>, token: SessionToken, deadline: Instant) {
    sleep_until(deadline).await;
    let Some(registry) = registry.upgrade() else {
        return;
    };
    let mut registry = registry.lock().await;
    if registry.invalidate(token.as_str()) {
        debug!(?token, "session expired");
    }
}
