use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{CAST_MOVIE_KEY, MOVIE_KEY, MovieStore, StoreResult, normalize_key};
use crate::models::Item;

#[derive(Default)]
struct Tables {
    movies: BTreeMap<i64, Item>,
    cast: Vec<(i64, Item)>,
}

/// Process-local store, used by tests and `STORE_BACKEND=memory`.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn get_movie(&self, id: i64) -> StoreResult<Option<Item>> {
        Ok(self.tables.read().await.movies.get(&id).cloned())
    }

    async fn delete_movie(&self, id: i64) -> StoreResult<()> {
        self.tables.write().await.movies.remove(&id);
        Ok(())
    }

    async fn cast_for_movie(&self, movie_id: i64) -> StoreResult<Vec<Item>> {
        let tables = self.tables.read().await;
        Ok(tables
            .cast
            .iter()
            .filter(|(id, _)| *id == movie_id)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn put_movie(&self, mut item: Item) -> StoreResult<()> {
        let id = normalize_key(&mut item, MOVIE_KEY)?;
        self.tables.write().await.movies.insert(id, item);
        Ok(())
    }

    async fn put_cast_member(&self, mut item: Item) -> StoreResult<()> {
        let movie_id = normalize_key(&mut item, CAST_MOVIE_KEY)?;
        let mut tables = self.tables.write().await;
        if !tables.cast.iter().any(|(id, row)| *id == movie_id && *row == item) {
            tables.cast.push((movie_id, item));
        }
        Ok(())
    }
}
