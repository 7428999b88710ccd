//! Error types for item operations.

use thiserror::Error;

/// Errors raised while validating or applying item commands.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ItemError {
    /// Negative or non-integer id, or an id expected to exist that does not.
    #[error("Illegal item id: {id}")]
    InvalidId { id: String },

    /// Explicit id on an add request is already live.
    #[error("Item with such id already exists: {id}")]
    AlreadyExists { id: u64 },

    /// Item title missing or not a string.
    #[error("Illegal item value")]
    InvalidTitle,

    /// Status field is not 0 or 1.
    #[error("Illegal item status: expected 0 or 1")]
    InvalidStatus,
}

impl ItemError {
    pub(crate) fn invalid_id(id: impl ToString) -> Self {
        ItemError::InvalidId { id: id.to_string() }
    }

    /// Check if this error is about an id that is malformed or not live.
    pub fn is_invalid_id(&self) -> bool {
        matches!(self, ItemError::InvalidId { .. })
    }

    /// Check if this error indicates a conflict with an existing item.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, ItemError::AlreadyExists { .. })
    }

    /// Check if this error comes from malformed request fields.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            ItemError::InvalidId { .. } | ItemError::InvalidTitle | ItemError::InvalidStatus
        )
    }
}

impl From<ItemError> for crate::Error {
    fn from(err: ItemError) -> Self {
        crate::Error::Item(err)
    }
}
