//! User system for todolist
//!
//! Provides registration data validation, user records owning their item
//! collections, and the username-keyed store.

pub mod errors;
pub mod store;
pub mod types;

pub use errors::UserError;
pub use store::UserStore;
pub use types::*;
