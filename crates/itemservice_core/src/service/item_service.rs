//! Item use-case service.
//!
//! # Invariants
//! - Service APIs never bypass repository persistence contracts.
//! - Service layer remains storage-agnostic; the backend is injected.

use crate::model::item::{Item, ItemId, ItemSearchCond, ItemUpdateDto};
use crate::repo::item_repo::{ItemRepository, RepoResult};
use log::info;

/// Use-case service wrapper for item CRUD operations.
pub struct ItemService<R: ItemRepository> {
    repo: R,
}

impl<R: ItemRepository> ItemService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Persists a new item and returns it with its generated id.
    pub fn save(&self, item: Item) -> RepoResult<Item> {
        let saved = self.repo.save(item)?;
        info!(
            "event=item_save module=service status=ok id={}",
            saved.id.unwrap_or_default()
        );
        Ok(saved)
    }

    /// Updates an existing item by id.
    ///
    /// Returns repository-level not-found errors unchanged.
    pub fn update(&self, id: ItemId, update: &ItemUpdateDto) -> RepoResult<()> {
        self.repo.update(id, update)?;
        info!("event=item_update module=service status=ok id={id}");
        Ok(())
    }

    pub fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        self.repo.find_by_id(id)
    }

    /// Lists items matching the optional name and price filters.
    pub fn find_items(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        self.repo.find_all(cond)
    }

    /// Returns the injected repository.
    pub fn repository(&self) -> &R {
        &self.repo
    }
}
