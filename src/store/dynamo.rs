use aws_config::{BehaviorVersion, Region};
use aws_sdk_dynamodb::{Client, error::DisplayErrorContext};
use async_trait::async_trait;
use tracing::debug;

use super::{
    CAST_MOVIE_KEY, MOVIE_KEY, MovieStore, StoreError, StoreResult,
    conversions::{attributes_from_item, item_from_attributes, number_attribute},
    normalize_key,
};
use crate::models::Item;

/// Movie table plus the global secondary index that holds cast rows.
#[derive(Clone)]
pub struct DynamoStore {
    client: Client,
    table_name: String,
    cast_index_name: String,
}

impl DynamoStore {
    pub async fn connect(
        table_name: String,
        cast_index_name: String,
        region: Option<String>,
        endpoint: Option<String>,
    ) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        Self::new(Client::new(&sdk_config), table_name, cast_index_name)
    }

    pub fn new(client: Client, table_name: String, cast_index_name: String) -> Self {
        Self { client, table_name, cast_index_name }
    }
}

fn sdk_error<E>(operation: &'static str, err: E) -> StoreError
where
    E: std::error::Error + 'static,
{
    StoreError::Dynamo { operation, message: DisplayErrorContext(err).to_string() }
}

#[async_trait]
impl MovieStore for DynamoStore {
    async fn get_movie(&self, id: i64) -> StoreResult<Option<Item>> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(MOVIE_KEY, number_attribute(id))
            .send()
            .await
            .map_err(|err| sdk_error("GetItem", err))?;

        output.item().map(item_from_attributes).transpose()
    }

    async fn delete_movie(&self, id: i64) -> StoreResult<()> {
        self.client
            .delete_item()
            .table_name(&self.table_name)
            .key(MOVIE_KEY, number_attribute(id))
            .send()
            .await
            .map_err(|err| sdk_error("DeleteItem", err))?;

        Ok(())
    }

    async fn cast_for_movie(&self, movie_id: i64) -> StoreResult<Vec<Item>> {
        let mut cast = Vec::new();
        let mut start_key = None;

        loop {
            let output = self
                .client
                .query()
                .table_name(&self.table_name)
                .index_name(&self.cast_index_name)
                .key_condition_expression("#movie = :m")
                .expression_attribute_names("#movie", CAST_MOVIE_KEY)
                .expression_attribute_values(":m", number_attribute(movie_id))
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|err| sdk_error("Query", err))?;

            for row in output.items() {
                cast.push(item_from_attributes(row)?);
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => {
                    debug!(movie_id, fetched = cast.len(), "following cast index page");
                    start_key = Some(key.clone());
                },
                _ => break,
            }
        }

        Ok(cast)
    }

    async fn put_movie(&self, mut item: Item) -> StoreResult<()> {
        normalize_key(&mut item, MOVIE_KEY)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(attributes_from_item(&item)))
            .send()
            .await
            .map_err(|err| sdk_error("PutItem", err))?;

        Ok(())
    }

    async fn put_cast_member(&self, mut item: Item) -> StoreResult<()> {
        normalize_key(&mut item, CAST_MOVIE_KEY)?;

        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(attributes_from_item(&item)))
            .send()
            .await
            .map_err(|err| sdk_error("PutItem", err))?;

        Ok(())
    }
}
