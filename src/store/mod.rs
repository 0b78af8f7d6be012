//! Persistence for movie and cast records.
//!
//! Handlers only see [`MovieStore`]; the concrete backend is picked from
//! configuration at startup.

mod conversions;
mod dynamo;
mod memory;
mod sqlite;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use tracing::info;

pub use dynamo::DynamoStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::{
    config::{Config, StoreBackend},
    models::Item,
};

pub const MOVIE_KEY: &str = "id";
pub const CAST_MOVIE_KEY: &str = "movieId";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("dynamodb {operation} failed: {message}")]
    Dynamo { operation: &'static str, message: String },

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("malformed record: {0}")]
    Malformed(String),

    #[error("cannot build a movie key from `{0}`")]
    InvalidKey(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn get_movie(&self, id: i64) -> StoreResult<Option<Item>>;

    /// Succeeds whether or not the movie existed.
    async fn delete_movie(&self, id: i64) -> StoreResult<()>;

    async fn cast_for_movie(&self, movie_id: i64) -> StoreResult<Vec<Item>>;

    async fn put_movie(&self, item: Item) -> StoreResult<()>;

    async fn put_cast_member(&self, item: Item) -> StoreResult<()>;
}

pub async fn connect(config: &Config) -> anyhow::Result<Arc<dyn MovieStore>> {
    let store: Arc<dyn MovieStore> = match config.backend {
        StoreBackend::Dynamo => {
            let table_name =
                config.table_name.clone().context("TABLE_NAME is required for dynamodb")?;
            info!(
                table = %table_name,
                index = %config.cast_index_name,
                region = config.region.as_deref().unwrap_or("default"),
                "using dynamodb store"
            );
            Arc::new(
                DynamoStore::connect(
                    table_name,
                    config.cast_index_name.clone(),
                    config.region.clone(),
                    config.dynamodb_endpoint.clone(),
                )
                .await,
            )
        },
        StoreBackend::Sqlite => {
            info!(url = %config.database_url, "using sqlite store");
            let db = crate::db::connect_and_migrate(config.database_url.as_str())
                .await
                .context("DATABASE_URL")?;
            Arc::new(SqliteStore::new(db))
        },
        StoreBackend::Memory => {
            info!("using in-memory store");
            Arc::new(MemoryStore::default())
        },
    };

    Ok(store)
}

/// Reads an integer key attribute and writes it back as a number, so the
/// numeric strings some exports carry are stored under the right key type.
pub(crate) fn normalize_key(item: &mut Item, key: &str) -> StoreResult<i64> {
    let value = item
        .get(key)
        .ok_or_else(|| StoreError::Malformed(format!("missing `{key}` attribute")))?;

    let id = value
        .as_i64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
        .ok_or_else(|| StoreError::Malformed(format!("`{key}` must be an integer, got {value}")))?;

    item.insert(key.to_string(), id.into());
    Ok(id)
}
