//! Postgres item store
//!
//! Insertion order is backed by a sequence column; ids are store-assigned
//! UUIDs. The partial update builds one SET clause per present patch
//! field, so omitted fields are never touched.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use tokio::sync::OnceCell;
use uuid::Uuid;

use scrapbook_core::StoreConfig;

use crate::models::{ItemPatch, Pagination};

use super::{Item, ItemStore, ItemSummary, NewItem, StoreError, StoreProvider};

/// Postgres-backed item store
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    /// Connect and run idempotent schema setup.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS todos (
                id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
                seq BIGSERIAL,
                text TEXT NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT FALSE,
                image TEXT,
                created_at TIMESTAMPTZ NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn list(&self, page: Pagination) -> Result<Vec<ItemSummary>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, text, completed, image
            FROM todos
            ORDER BY seq ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| ItemSummary {
                id: r.get("id"),
                text: r.get("text"),
                completed: r.get("completed"),
                image: r.get("image"),
            })
            .collect())
    }

    async fn insert(&self, new: NewItem) -> Result<Item, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO todos (text, completed, image, created_at)
            VALUES ($1, FALSE, $2, $3)
            RETURNING id, text, completed, image, created_at
            "#,
        )
        .bind(new.text.as_str())
        .bind(new.image.as_deref())
        .bind(new.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(Item {
            id: row.get("id"),
            text: row.get("text"),
            completed: row.get("completed"),
            image: row.get("image"),
            created_at: row.get("created_at"),
        })
    }

    async fn update(&self, id: Uuid, patch: ItemPatch) -> Result<u64, StoreError> {
        if patch.is_empty() {
            return Ok(0);
        }

        let mut builder = sqlx::QueryBuilder::new("UPDATE todos SET ");
        let mut set = builder.separated(", ");
        if let Some(text) = &patch.text {
            set.push("text = ");
            set.push_bind_unseparated(text.as_str());
        }
        if let Some(completed) = patch.completed {
            set.push("completed = ");
            set.push_bind_unseparated(completed);
        }
        if let Some(image) = &patch.image {
            set.push("image = ");
            set.push_bind_unseparated(image.as_str());
        }
        builder.push(" WHERE id = ");
        builder.push_bind(id);

        let result = builder.build().execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// Connection manager for the Postgres store.
///
/// The first `acquire` connects and caches the handle; connect failure
/// propagates and leaves the cell empty, so the next call retries. Two
/// racing cold calls may both attempt a connect; the cell keeps exactly
/// one result.
pub struct PgStoreProvider {
    config: StoreConfig,
    store: OnceCell<PgItemStore>,
}

impl PgStoreProvider {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            store: OnceCell::new(),
        }
    }
}

#[async_trait]
impl StoreProvider for PgStoreProvider {
    async fn acquire(&self) -> Result<&dyn ItemStore, StoreError> {
        let store = self
            .store
            .get_or_try_init(|| PgItemStore::connect(&self.config))
            .await?;

        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use crate::models::ItemText;

    use super::*;

    // Integration tests require a real database
    // Run with: DATABASE_URL=postgres://... cargo test -p scrapbook-server -- --ignored

    fn test_config() -> StoreConfig {
        StoreConfig {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL required"),
            max_connections: 5,
        }
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn insert_list_roundtrip() {
        let store = PgItemStore::connect(&test_config())
            .await
            .expect("connect failed");

        let item = store
            .insert(NewItem {
                text: ItemText::new("roundtrip").unwrap(),
                image: None,
                created_at: Utc::now(),
            })
            .await
            .expect("insert failed");

        assert!(!item.completed);
        assert_eq!(item.image, None);

        store.delete(item.id).await.expect("cleanup failed");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn provider_memoizes_handle() {
        let provider = PgStoreProvider::new(test_config());

        let first = provider.acquire().await.expect("first acquire failed");
        let second = provider.acquire().await.expect("second acquire failed");

        assert!(std::ptr::eq(
            first as *const dyn ItemStore as *const (),
            second as *const dyn ItemStore as *const ()
        ));
    }
}
