//! Item domain model and the value objects used to query and update it.
//!
//! # Invariants
//! - `id` is `None` until the storage layer assigns one on insert.
//! - Once assigned, `id` is never rewritten by update paths.
//! - `item_name` length is bounded by the storage schema, not here.

use serde::{Deserialize, Serialize};

/// Storage-generated identifier (auto-increment semantics).
pub type ItemId = i64;

/// Maximum `item_name` length in characters accepted by every backend.
pub const ITEM_NAME_MAX_LEN: usize = 10;

/// Canonical item record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Assigned by the repository on `save`.
    pub id: Option<ItemId>,
    pub item_name: String,
    pub price: i32,
    pub quantity: i32,
}

impl Item {
    /// Creates an item that has not been persisted yet.
    pub fn new(item_name: impl Into<String>, price: i32, quantity: i32) -> Self {
        Self {
            id: None,
            item_name: item_name.into(),
            price,
            quantity,
        }
    }

    /// Overwrites the mutable fields from `update`, keeping `id` intact.
    pub fn apply_update(&mut self, update: &ItemUpdateDto) {
        self.item_name = update.item_name.clone();
        self.price = update.price;
        self.quantity = update.quantity;
    }
}

/// Optional search filters for `find_all`.
///
/// A blank `item_name` (empty or whitespace only) means "no name filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSearchCond {
    pub item_name: Option<String>,
    pub max_price: Option<i32>,
}

impl ItemSearchCond {
    pub fn new(item_name: Option<String>, max_price: Option<i32>) -> Self {
        Self {
            item_name,
            max_price,
        }
    }

    pub fn by_name(item_name: impl Into<String>) -> Self {
        Self::new(Some(item_name.into()), None)
    }

    pub fn by_max_price(max_price: i32) -> Self {
        Self::new(None, Some(max_price))
    }
}

/// Fields an update is allowed to change. The id is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdateDto {
    pub item_name: String,
    pub price: i32,
    pub quantity: i32,
}

impl ItemUpdateDto {
    pub fn new(item_name: impl Into<String>, price: i32, quantity: i32) -> Self {
        Self {
            item_name: item_name.into(),
            price,
            quantity,
        }
    }
}
