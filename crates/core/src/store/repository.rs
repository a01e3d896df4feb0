//! Typed item access over a [`StateStore`].

use std::sync::Arc;

use tracing::warn;

use super::{Record, StateStore, StoreError};
use crate::item::Item;

/// Reads and writes [`Item`]s through a shared state store.
///
/// Read-modify-write operations go through [`StateStore::update`], so a
/// search refresh and a progress update for the same id never lose each
/// other's fields while updates for different ids stay independent.
#[derive(Clone)]
pub struct ItemRepository {
    store: Arc<dyn StateStore>,
}

impl ItemRepository {
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    pub fn get_item(&self, id: &str) -> Result<Option<Item>, StoreError> {
        match self.store.get(id)? {
            Some(record) => Ok(Some(Item::from_record(id, &record)?)),
            None => Ok(None),
        }
    }

    /// Overwrite the stored item under its own id.
    pub fn put_item(&self, item: &Item) -> Result<(), StoreError> {
        self.store.set(&item.id, &item.to_record()?)
    }

    pub fn contains(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.store.get(id)?.is_some())
    }

    /// Every stored item, ordered by id.
    pub fn list_items(&self) -> Result<Vec<Item>, StoreError> {
        let mut items = Vec::new();
        for id in self.store.keys()? {
            // A key can vanish between listing and reading.
            match self.get_item(&id)? {
                Some(item) => items.push(item),
                None => warn!(id = %id, "Item disappeared while listing"),
            }
        }
        Ok(items)
    }

    /// Apply `f` to the stored item and write it back atomically.
    ///
    /// Returns the updated item, or `None` when no item is stored under `id`.
    pub fn update_item<F>(&self, id: &str, f: F) -> Result<Option<Item>, StoreError>
    where
        F: FnOnce(&mut Item),
    {
        let mut updated = None;
        self.store.update(
            id,
            Box::new(|current: Option<Record>| -> Result<Option<Record>, StoreError> {
                let Some(record) = current else {
                    return Ok(None);
                };
                let mut item = Item::from_record(id, &record)?;
                f(&mut item);
                let record = item.to_record()?;
                updated = Some(item);
                Ok(Some(record))
            }),
        )?;
        Ok(updated)
    }

    /// Record a search result. An existing item keeps its download status
    /// and path; catalog fields are refreshed.
    pub fn store_discovered(&self, found: Item) -> Result<Item, StoreError> {
        let id = found.id.clone();
        let mut stored = None;
        self.store.update(
            &id,
            Box::new(|current: Option<Record>| -> Result<Option<Record>, StoreError> {
                let item = match current {
                    Some(record) => {
                        let mut existing = Item::from_record(&id, &record)?;
                        existing.merge_discovered(found);
                        existing.refresh_eta();
                        existing
                    }
                    None => found,
                };
                let record = item.to_record()?;
                stored = Some(item);
                Ok(Some(record))
            }),
        )?;
        stored.ok_or_else(|| StoreError::Internal(format!("item {} was not written", id)))
    }
}
