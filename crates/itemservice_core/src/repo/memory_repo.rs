//! In-process item repository.
//!
//! # Invariants
//! - Ids come from a sequence starting at 1 that `clear` does not reset.
//! - The `item_name` length limit of the SQL schema is enforced on writes.
//! - `update` reports `NotFound` before any constraint check.
//! - Iteration order is ascending id, which equals insertion order.

use crate::model::item::{Item, ItemId, ItemSearchCond, ItemUpdateDto, ITEM_NAME_MAX_LEN};
use crate::repo::filter::ItemFilter;
use crate::repo::item_repo::{ItemRepository, RepoError, RepoResult};
use log::debug;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
struct MemoryState {
    items: BTreeMap<ItemId, Item>,
    sequence: ItemId,
}

/// Mutex-guarded map implementation of `ItemRepository`.
#[derive(Debug, Default)]
pub struct MemoryItemRepository {
    state: Mutex<MemoryState>,
}

impl MemoryItemRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every stored item. Used to isolate tests sharing one store.
    pub fn clear(&self) -> RepoResult<()> {
        self.lock()?.items.clear();
        Ok(())
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, MemoryState>> {
        self.state.lock().map_err(|_| RepoError::LockPoisoned)
    }
}

impl ItemRepository for MemoryItemRepository {
    fn save(&self, mut item: Item) -> RepoResult<Item> {
        check_item_name(&item.item_name)?;

        let mut state = self.lock()?;
        state.sequence += 1;
        let id = state.sequence;
        item.id = Some(id);
        state.items.insert(id, item.clone());

        debug!("event=item_save module=repo backend=memory status=ok id={id}");
        Ok(item)
    }

    fn update(&self, id: ItemId, update: &ItemUpdateDto) -> RepoResult<()> {
        let mut state = self.lock()?;
        let item = state.items.get_mut(&id).ok_or(RepoError::NotFound(id))?;
        check_item_name(&update.item_name)?;
        item.apply_update(update);

        debug!("event=item_update module=repo backend=memory status=ok id={id}");
        Ok(())
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        Ok(self.lock()?.items.get(&id).cloned())
    }

    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        let filter = ItemFilter::from_cond(cond);
        let state = self.lock()?;

        let items: Vec<Item> = state
            .items
            .values()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect();
        debug!(
            "event=item_find_all module=repo backend=memory unfiltered={} count={}",
            filter.is_unfiltered(),
            items.len()
        );
        Ok(items)
    }
}

fn check_item_name(item_name: &str) -> RepoResult<()> {
    let len = item_name.chars().count();
    if len > ITEM_NAME_MAX_LEN {
        return Err(RepoError::ConstraintViolation(format!(
            "item.item_name length {len} exceeds {ITEM_NAME_MAX_LEN}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::MemoryItemRepository;
    use crate::model::item::{Item, ItemSearchCond};
    use crate::repo::item_repo::ItemRepository;

    #[test]
    fn clear_does_not_reuse_ids() {
        let repo = MemoryItemRepository::new();
        let first = repo.save(Item::new("a", 1, 1)).unwrap();
        repo.clear().unwrap();

        let second = repo.save(Item::new("b", 1, 1)).unwrap();

        assert_eq!(first.id, Some(1));
        assert_eq!(second.id, Some(2));
        assert_eq!(repo.find_all(&ItemSearchCond::default()).unwrap().len(), 1);
    }

    #[test]
    fn save_ignores_caller_supplied_id() {
        let repo = MemoryItemRepository::new();
        let mut item = Item::new("a", 1, 1);
        item.id = Some(42);

        let saved = repo.save(item).unwrap();

        assert_eq!(saved.id, Some(1));
        assert!(repo.find_by_id(42).unwrap().is_none());
    }
}
