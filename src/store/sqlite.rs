use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};
use serde_json::Value;

use super::{CAST_MOVIE_KEY, MOVIE_KEY, MovieStore, StoreError, StoreResult, normalize_key};
use crate::{
    entities::{movie, movie_cast},
    models::Item,
};

/// Local stand-in for the managed table: `movie` keyed by id, `movie_cast`
/// indexed on `movie_id`.
#[derive(Clone)]
pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn into_item(attributes: Value) -> StoreResult<Item> {
    match attributes {
        Value::Object(item) => Ok(item),
        other => Err(StoreError::Malformed(format!("expected an object, got {other}"))),
    }
}

#[async_trait]
impl MovieStore for SqliteStore {
    async fn get_movie(&self, id: i64) -> StoreResult<Option<Item>> {
        let row = movie::Entity::find_by_id(id).one(&self.db).await?;
        row.map(|m| into_item(m.attributes)).transpose()
    }

    async fn delete_movie(&self, id: i64) -> StoreResult<()> {
        movie::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn cast_for_movie(&self, movie_id: i64) -> StoreResult<Vec<Item>> {
        movie_cast::Entity::find()
            .filter(movie_cast::Column::MovieId.eq(movie_id))
            .order_by_asc(movie_cast::Column::Id)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|row| into_item(row.attributes))
            .collect()
    }

    async fn put_movie(&self, mut item: Item) -> StoreResult<()> {
        let id = normalize_key(&mut item, MOVIE_KEY)?;
        let model = movie::ActiveModel { id: Set(id), attributes: Set(Value::Object(item)) };

        movie::Entity::insert(model)
            .on_conflict(
                OnConflict::column(movie::Column::Id)
                    .update_column(movie::Column::Attributes)
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }

    async fn put_cast_member(&self, mut item: Item) -> StoreResult<()> {
        let movie_id = normalize_key(&mut item, CAST_MOVIE_KEY)?;
        let model = movie_cast::ActiveModel {
            id: Default::default(),
            movie_id: Set(movie_id),
            attributes: Set(Value::Object(item)),
        };

        // Identical rows collapse onto the unique (movie_id, attributes) index.
        let inserted = movie_cast::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([movie_cast::Column::MovieId, movie_cast::Column::Attributes])
                    .do_nothing()
                    .to_owned(),
            )
            .exec(&self.db)
            .await;

        match inserted {
            Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
