//! Per-user to-do item collection.
//!
//! An [`ItemCollection`] is a mapping from integer id to [`Item`] plus a
//! monotonic cursor used to auto-assign ids. The cursor starts at the number of
//! items the collection was built with and only ever moves forward, so ids freed
//! by deletion are never handed out again automatically. A caller may still
//! reuse a freed id by naming it explicitly.
//!
//! The collection is deliberately permissive: [`ItemCollection::set_item`] with
//! an explicit id overwrites whatever lives there. Callers that need
//! "reject if exists" semantics go through [`ItemCommand`], which checks first.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub mod command;
pub mod errors;

pub use command::{AddItemRequest, ItemCommand, RemoveItemRequest, UpdateItemRequest};
pub use errors::ItemError;

/// Identifier of an item within one collection.
pub type ItemId = u64;

/// A single to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub completed: bool,
}

/// Replacement fields for an existing item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemUpdate {
    pub title: String,
    pub completed: bool,
}

/// Ordered mapping from id to item, owning id assignment.
#[derive(Debug, Clone, Default)]
pub struct ItemCollection {
    items: BTreeMap<ItemId, Item>,
    /// Next candidate for auto-assignment. Never decremented.
    next_id: ItemId,
}

impl ItemCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a collection from existing items.
    ///
    /// The cursor starts at the number of items provided; occupied ids at or
    /// beyond it are skipped on first assignment.
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let items: BTreeMap<ItemId, Item> = items.into_iter().map(|i| (i.id, i)).collect();
        let next_id = items.len() as ItemId;
        Self { items, next_id }
    }

    /// Look up an item by id.
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    /// Check whether an id is currently live.
    pub fn contains(&self, id: ItemId) -> bool {
        self.items.contains_key(&id)
    }

    /// Insert a new, not-completed item.
    ///
    /// With `id == None` the next free id from the cursor is assigned. With an
    /// explicit id the item is inserted there, overwriting any existing item in
    /// place (title replaced, `completed` reset to `false`).
    pub fn set_item(&mut self, title: impl Into<String>, id: Option<ItemId>) -> &Item {
        let id = match id {
            Some(id) => id,
            None => self.next_free_id(),
        };
        let item = Item {
            id,
            title: title.into(),
            completed: false,
        };
        self.items.insert(id, item);
        &self.items[&id]
    }

    /// Scan forward from the cursor past live ids, leaving it just past the result.
    fn next_free_id(&mut self) -> ItemId {
        while self.items.contains_key(&self.next_id) {
            self.next_id += 1;
        }
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Remove an item. Returns whether it was present.
    pub fn remove_todo(&mut self, id: ItemId) -> bool {
        self.items.remove(&id).is_some()
    }

    /// Remove every completed item, returning how many were removed.
    pub fn remove_completed(&mut self) -> usize {
        let before = self.items.len();
        self.items.retain(|_, item| !item.completed);
        before - self.items.len()
    }

    /// Update title and status of an existing item in place.
    ///
    /// Returns `false` without touching anything when the id is not live.
    pub fn replace_todo(&mut self, id: ItemId, update: ItemUpdate) -> bool {
        match self.items.get_mut(&id) {
            Some(item) => {
                item.title = update.title;
                item.completed = update.completed;
                true
            }
            None => false,
        }
    }

    /// Set the completed status on every item.
    pub fn mark_all(&mut self, completed: bool) {
        for item in self.items.values_mut() {
            item.completed = completed;
        }
    }

    /// Number of items whose status equals `completed`.
    pub fn count(&self, completed: bool) -> usize {
        self.items
            .values()
            .filter(|item| item.completed == completed)
            .count()
    }

    /// Total number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterate items in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Read-only snapshot for serialization.
    ///
    /// Serializes as a JSON object keyed by the id's string form, each value
    /// being `{id, title, completed}`.
    pub fn json_view(&self) -> &BTreeMap<ItemId, Item> {
        &self.items
    }
}
