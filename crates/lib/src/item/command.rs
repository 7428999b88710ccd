//! Typed item commands built from loosely-typed request bodies.
//!
//! Request bodies arrive as JSON with fields of unknown type. Each endpoint has
//! its own request struct; converting it into an [`ItemCommand`] validates every
//! field once, so [`ItemCommand::apply`] only ever sees well-formed input.
//!
//! The command layer is the strict one. Adding at an id that is already live is
//! rejected here even though [`ItemCollection::set_item`] would overwrite.

use serde::Deserialize;
use serde_json::Value;

use super::{Item, ItemCollection, ItemError, ItemId, ItemUpdate};
use crate::constants::WILDCARD_ID;

/// Body of an add request: `{id, value}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddItemRequest {
    pub id: Option<Value>,
    pub value: Option<Value>,
}

/// Body of an update request: `{id, value, status}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub id: Option<Value>,
    pub value: Option<Value>,
    pub status: Option<Value>,
}

/// Body of a delete request: `{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoveItemRequest {
    pub id: Option<Value>,
}

/// A validated mutation of one user's item collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemCommand {
    /// Insert a new item; `None` auto-assigns the id.
    Add { id: Option<ItemId>, title: String },
    /// Replace title and status of a live item.
    Update {
        id: ItemId,
        title: String,
        completed: bool,
    },
    /// Set the status of every item.
    MarkAll { completed: bool },
    /// Delete a live item.
    Remove { id: ItemId },
    /// Delete every completed item.
    RemoveCompleted,
}

impl ItemCommand {
    /// Apply the command, returning the created item for [`ItemCommand::Add`].
    pub fn apply(self, items: &mut ItemCollection) -> Result<Option<Item>, ItemError> {
        match self {
            ItemCommand::Add { id, title } => {
                if let Some(id) = id
                    && items.contains(id)
                {
                    return Err(ItemError::AlreadyExists { id });
                }
                Ok(Some(items.set_item(title, id).clone()))
            }
            ItemCommand::Update {
                id,
                title,
                completed,
            } => {
                if items.replace_todo(id, ItemUpdate { title, completed }) {
                    Ok(None)
                } else {
                    Err(ItemError::invalid_id(id))
                }
            }
            ItemCommand::MarkAll { completed } => {
                items.mark_all(completed);
                Ok(None)
            }
            ItemCommand::Remove { id } => {
                if items.remove_todo(id) {
                    Ok(None)
                } else {
                    Err(ItemError::invalid_id(id))
                }
            }
            ItemCommand::RemoveCompleted => {
                items.remove_completed();
                Ok(None)
            }
        }
    }
}

impl TryFrom<AddItemRequest> for ItemCommand {
    type Error = ItemError;

    fn try_from(request: AddItemRequest) -> Result<Self, Self::Error> {
        let id = match present(request.id) {
            Some(raw) => Some(non_negative(parse_id(&raw)?)?),
            None => None,
        };
        let title = parse_title(request.value)?;
        Ok(ItemCommand::Add { id, title })
    }
}

impl TryFrom<UpdateItemRequest> for ItemCommand {
    type Error = ItemError;

    fn try_from(request: UpdateItemRequest) -> Result<Self, Self::Error> {
        let completed = parse_status(request.status)?;
        let raw = present(request.id).ok_or_else(|| ItemError::invalid_id("missing"))?;
        let id = parse_integer_id(&raw)?;
        if id == WILDCARD_ID {
            return Ok(ItemCommand::MarkAll { completed });
        }
        let id = non_negative(id)?;
        let title = parse_title(request.value)?;
        Ok(ItemCommand::Update {
            id,
            title,
            completed,
        })
    }
}

impl TryFrom<RemoveItemRequest> for ItemCommand {
    type Error = ItemError;

    fn try_from(request: RemoveItemRequest) -> Result<Self, Self::Error> {
        let raw = present(request.id).ok_or_else(|| ItemError::invalid_id("missing"))?;
        let id = parse_id(&raw)?;
        if id == WILDCARD_ID {
            return Ok(ItemCommand::RemoveCompleted);
        }
        Ok(ItemCommand::Remove {
            id: non_negative(id)?,
        })
    }
}

/// Treat an explicit JSON `null` the same as a missing field.
fn present(value: Option<Value>) -> Option<Value> {
    value.filter(|v| !v.is_null())
}

/// Accepts a JSON integer or a string holding one.
fn parse_id(raw: &Value) -> Result<i64, ItemError> {
    match raw {
        Value::Number(n) => n.as_i64().ok_or_else(|| ItemError::invalid_id(n)),
        Value::String(s) => s.trim().parse().map_err(|_| ItemError::invalid_id(s)),
        other => Err(ItemError::invalid_id(other)),
    }
}

/// Accepts only a JSON integer; updates do not coerce strings.
fn parse_integer_id(raw: &Value) -> Result<i64, ItemError> {
    match raw {
        Value::Number(_) => parse_id(raw),
        other => Err(ItemError::invalid_id(other)),
    }
}

fn non_negative(id: i64) -> Result<ItemId, ItemError> {
    ItemId::try_from(id).map_err(|_| ItemError::invalid_id(id))
}

fn parse_title(value: Option<Value>) -> Result<String, ItemError> {
    match value {
        Some(Value::String(title)) => Ok(title),
        _ => Err(ItemError::InvalidTitle),
    }
}

/// Status is exactly 0 (active) or 1 (completed).
fn parse_status(value: Option<Value>) -> Result<bool, ItemError> {
    match value.as_ref().and_then(Value::as_i64) {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        _ => Err(ItemError::InvalidStatus),
    }
}
