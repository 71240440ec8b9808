//! In-memory item store
//!
//! Backs router and integration tests; keeps items in insertion order the
//! same way the Postgres sequence column does.

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::models::{ItemPatch, Pagination};

use super::{Item, ItemStore, ItemSummary, NewItem, StoreError, StoreProvider};

/// In-memory item store
#[derive(Default)]
pub struct MemoryItemStore {
    items: Mutex<Vec<Item>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn list(&self, page: Pagination) -> Result<Vec<ItemSummary>, StoreError> {
        let items = self.items.lock().await;
        Ok(items
            .iter()
            .skip(page.offset() as usize)
            .take(page.limit() as usize)
            .map(|item| ItemSummary {
                id: item.id,
                text: item.text.clone(),
                completed: item.completed,
                image: item.image.clone(),
            })
            .collect())
    }

    async fn insert(&self, new: NewItem) -> Result<Item, StoreError> {
        let item = Item {
            id: Uuid::new_v4(),
            text: new.text.into_string(),
            completed: false,
            image: new.image,
            created_at: new.created_at,
        };

        self.items.lock().await.push(item.clone());
        Ok(item)
    }

    async fn update(&self, id: Uuid, patch: ItemPatch) -> Result<u64, StoreError> {
        let mut items = self.items.lock().await;
        let Some(item) = items.iter_mut().find(|item| item.id == id) else {
            return Ok(0);
        };

        if let Some(text) = patch.text {
            item.text = text.into_string();
        }
        if let Some(completed) = patch.completed {
            item.completed = completed;
        }
        if let Some(image) = patch.image {
            item.image = Some(image);
        }

        Ok(1)
    }

    async fn delete(&self, id: Uuid) -> Result<u64, StoreError> {
        let mut items = self.items.lock().await;
        let before = items.len();
        items.retain(|item| item.id != id);
        Ok((before - items.len()) as u64)
    }
}

/// Provider over an in-memory store; `acquire` never fails
#[derive(Default)]
pub struct MemoryStoreProvider {
    store: MemoryItemStore,
}

impl MemoryStoreProvider {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StoreProvider for MemoryStoreProvider {
    async fn acquire(&self) -> Result<&dyn ItemStore, StoreError> {
        Ok(&self.store)
    }
}
