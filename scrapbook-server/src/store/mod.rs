//! Item store abstraction
//!
//! The store is an opaque persistent collection with ordered insertion and
//! store-assigned unique ids. Handlers reach it through `StoreProvider`,
//! which memoizes the live handle for the process lifetime; a failed
//! connect leaves the slot empty so the next call retries from scratch.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{ItemPatch, ItemText, Pagination};

pub mod memory;
pub mod postgres;

pub use memory::{MemoryItemStore, MemoryStoreProvider};
pub use postgres::{PgItemStore, PgStoreProvider};

/// Stored item as persisted
#[derive(Debug, Clone)]
pub struct Item {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Reduced projection returned by list operations.
///
/// Timestamps and any future large fields stay out of list pages.
#[derive(Debug, Clone)]
pub struct ItemSummary {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub image: Option<String>,
}

/// Fields for a new item; the store assigns the id
#[derive(Debug, Clone)]
pub struct NewItem {
    pub text: ItemText,
    /// Resolved image URL, never an inline payload
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Store error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Operations on the single item collection
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// One page of items in insertion order, projected for list display.
    async fn list(&self, page: Pagination) -> Result<Vec<ItemSummary>, StoreError>;

    /// Insert a new item with `completed = false`; returns the stored row.
    async fn insert(&self, new: NewItem) -> Result<Item, StoreError>;

    /// Apply a partial update, one set-operation per present field.
    /// Returns the number of matched rows (zero is not an error).
    async fn update(&self, id: Uuid, patch: ItemPatch) -> Result<u64, StoreError>;

    /// Remove the item with the given id; returns the delete count.
    async fn delete(&self, id: Uuid) -> Result<u64, StoreError>;
}

/// Connection manager: yields the memoized store handle, connecting on
/// first use.
#[async_trait]
pub trait StoreProvider: Send + Sync {
    async fn acquire(&self) -> Result<&dyn ItemStore, StoreError>;
}
