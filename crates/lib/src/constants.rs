//! Constants used throughout the todolist library.
//!
//! Central definitions for session timing, cookie naming and the reserved
//! item identifiers shared by the core and the request layer.

use std::time::Duration;

/// Lifetime of a session, measured from its creation. Never extended on use.
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(30 * 60);

/// Longest accepted session timeout, one year in seconds.
pub const MAX_SESSION_TIMEOUT_SECS: u64 = 365 * 24 * 60 * 60;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "key";

/// Path of the item endpoints; the session cookie is scoped to it.
pub const ITEM_PATH: &str = "/item";

/// Wildcard item id meaning "all items" for bulk status updates and bulk deletes.
pub const WILDCARD_ID: i64 = -1;

/// Number of random bytes in a session token (160 bits).
pub const TOKEN_BYTES: usize = 20;
