//! Username-keyed store of user records.

use std::collections::HashMap;

use tracing::info;

use super::{Registration, UserError, UserRecord};

/// Mapping from username to [`UserRecord`].
///
/// The system of record for existence checks on registration and login.
/// Entries live until [`UserStore::reset`].
#[derive(Debug, Default)]
pub struct UserStore {
    users: HashMap<String, UserRecord>,
}

impl UserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a record for a new user.
    pub fn register(&mut self, registration: Registration) -> Result<&mut UserRecord, UserError> {
        if self.users.contains_key(&registration.username) {
            return Err(UserError::UsernameAlreadyExists {
                username: registration.username,
            });
        }
        let username = registration.username.clone();
        info!(%username, "registered user");
        Ok(self
            .users
            .entry(username)
            .or_insert_with(|| UserRecord::new(registration)))
    }

    pub fn find(&self, username: &str) -> Option<&UserRecord> {
        self.users.get(username)
    }

    pub fn find_mut(&mut self, username: &str) -> Option<&mut UserRecord> {
        self.users.get_mut(username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Drop every record.
    pub fn reset(&mut self) {
        self.users.clear();
    }
}
