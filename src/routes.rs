use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::PathRejection},
    routing::get,
};
use tracing::{debug, info, warn};

use crate::{
    AppState,
    error::{AppError, AppResult, INVALID_GET_ID, MISSING_DELETE_ID, MISSING_GET_ID},
    models::{Message, MovieQuery, MovieResponse, parse_movie_id},
    store::StoreError,
};

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/movies/{movie_id}", get(get_movie).delete(delete_movie))
        .route("/movies", get(get_movie_without_id).delete(delete_movie_without_id))
        .route("/movies/", get(get_movie_without_id).delete(delete_movie_without_id))
        .with_state(state)
}

/// The identifier is not validated up front: one that cannot form a key fails
/// like any other store error.
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Json<Message>> {
    let raw_id = match path {
        Ok(Path(raw_id)) => raw_id,
        Err(rejection) => return Err(StoreError::InvalidKey(rejection.body_text()).into()),
    };
    let id = parse_movie_id(&raw_id).ok_or_else(|| StoreError::InvalidKey(raw_id.clone()))?;

    state.store.delete_movie(id).await?;
    info!(movie_id = id, "movie deleted");

    Ok(Json(Message::new(format!("Movie with ID {raw_id} deleted"))))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<MovieResponse>> {
    let Ok(Path(raw_id)) = path.inspect_err(|rejection| {
        warn!(error = %rejection.body_text(), "undecodable movie id");
    }) else {
        return Err(AppError::BadRequest(INVALID_GET_ID));
    };
    let id = parse_movie_id(&raw_id).ok_or(AppError::BadRequest(INVALID_GET_ID))?;
    let query = MovieQuery::from_pairs(pairs);

    let movie = state.store.get_movie(id).await?.ok_or(AppError::NotFound)?;

    let cast = if query.include_cast() {
        let cast = state.store.cast_for_movie(id).await?;
        debug!(movie_id = id, cast = cast.len(), "joined cast");
        Some(cast)
    } else {
        None
    };

    Ok(Json(MovieResponse { movie, cast }))
}

async fn delete_movie_without_id() -> AppError {
    AppError::BadRequest(MISSING_DELETE_ID)
}

async fn get_movie_without_id() -> AppError {
    AppError::BadRequest(MISSING_GET_ID)
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::{
        models::Item,
        store::{MemoryStore, MovieStore, StoreError, StoreResult},
    };

    /// Fails every call the way an unreachable table would.
    struct BrokenStore;

    fn outage(operation: &'static str) -> StoreError {
        StoreError::Dynamo {
            operation,
            message: "ResourceNotFoundException: arn:aws:dynamodb:eu-west-1:123456789012:table/Movies"
                .to_string(),
        }
    }

    #[async_trait]
    impl MovieStore for BrokenStore {
        async fn get_movie(&self, _id: i64) -> StoreResult<Option<Item>> {
            Err(outage("GetItem"))
        }

        async fn delete_movie(&self, _id: i64) -> StoreResult<()> {
            Err(outage("DeleteItem"))
        }

        async fn cast_for_movie(&self, _movie_id: i64) -> StoreResult<Vec<Item>> {
            Err(outage("Query"))
        }

        async fn put_movie(&self, _item: Item) -> StoreResult<()> {
            Err(outage("PutItem"))
        }

        async fn put_cast_member(&self, _item: Item) -> StoreResult<()> {
            Err(outage("PutItem"))
        }
    }

    /// Movie rows exist, but the cast index is unavailable.
    struct BrokenIndexStore(MemoryStore);

    #[async_trait]
    impl MovieStore for BrokenIndexStore {
        async fn get_movie(&self, id: i64) -> StoreResult<Option<Item>> {
            self.0.get_movie(id).await
        }

        async fn delete_movie(&self, id: i64) -> StoreResult<()> {
            self.0.delete_movie(id).await
        }

        async fn cast_for_movie(&self, _movie_id: i64) -> StoreResult<Vec<Item>> {
            Err(outage("Query"))
        }

        async fn put_movie(&self, item: Item) -> StoreResult<()> {
            self.0.put_movie(item).await
        }

        async fn put_cast_member(&self, item: Item) -> StoreResult<()> {
            self.0.put_cast_member(item).await
        }
    }

    fn item(value: Value) -> Item {
        value.as_object().cloned().unwrap()
    }

    async fn seeded_store() -> MemoryStore {
        let store = MemoryStore::default();
        store.put_movie(item(json!({"id": 1234, "title": "Alien", "year": 1979}))).await.unwrap();
        store.put_movie(item(json!({"id": 5678, "title": "Ran"}))).await.unwrap();
        store
            .put_cast_member(item(json!({"movieId": 1234, "actorName": "Sigourney Weaver"})))
            .await
            .unwrap();
        store
            .put_cast_member(item(json!({"movieId": 1234, "actorName": "John Hurt"})))
            .await
            .unwrap();
        store
    }

    fn app(store: impl MovieStore + 'static) -> Router {
        router(Arc::new(AppState { store: Arc::new(store) }))
    }

    async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn get_returns_movie_without_cast_by_default() {
        let (status, body) = send(app(seeded_store().await), Method::GET, "/movies/1234").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"movie": {"id": 1234, "title": "Alien", "year": 1979}}));
    }

    #[tokio::test]
    async fn get_joins_cast_when_requested() {
        let (status, body) =
            send(app(seeded_store().await), Method::GET, "/movies/1234?cast=true").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["movie"]["title"], "Alien");
        assert_eq!(
            body["cast"],
            json!([
                {"movieId": 1234, "actorName": "Sigourney Weaver"},
                {"movieId": 1234, "actorName": "John Hurt"},
            ])
        );
    }

    #[tokio::test]
    async fn get_with_cast_on_movie_without_cast_returns_empty_array() {
        let (status, body) =
            send(app(seeded_store().await), Method::GET, "/movies/5678?cast=true").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cast"], json!([]));
    }

    #[tokio::test]
    async fn get_ignores_other_cast_values() {
        let (_, body) =
            send(app(seeded_store().await), Method::GET, "/movies/1234?cast=yes").await;

        assert!(body.get("cast").is_none());
    }

    #[tokio::test]
    async fn get_unknown_movie_is_not_found() {
        let (status, body) = send(app(seeded_store().await), Method::GET, "/movies/1").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "Movie not found"}));
    }

    #[tokio::test]
    async fn get_rejects_non_numeric_id() {
        let (status, body) = send(app(seeded_store().await), Method::GET, "/movies/alien").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "Invalid movieId. Must be a number."}));
    }

    #[tokio::test]
    async fn get_without_id_is_bad_request() {
        for uri in ["/movies", "/movies/"] {
            let (status, body) = send(app(MemoryStore::default()), Method::GET, uri).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"message": "Missing movieId in path"}));
        }
    }

    #[tokio::test]
    async fn delete_confirms_existing_and_missing_movies() {
        let store = seeded_store().await;

        for uri in ["/movies/1234", "/movies/1234", "/movies/42"] {
            let (status, body) = send(app(store.clone()), Method::DELETE, uri).await;
            let id = uri.trim_start_matches("/movies/");

            assert_eq!(status, StatusCode::OK);
            assert_eq!(body, json!({"message": format!("Movie with ID {id} deleted")}));
        }

        assert_eq!(store.get_movie(1234).await.unwrap(), None);
        assert!(store.get_movie(5678).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_without_id_is_bad_request() {
        for uri in ["/movies", "/movies/"] {
            let (status, body) = send(app(MemoryStore::default()), Method::DELETE, uri).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body, json!({"message": "Missing movie ID in path"}));
        }
    }

    #[tokio::test]
    async fn delete_with_id_that_cannot_form_a_key_is_a_server_error() {
        let store = seeded_store().await;

        for uri in ["/movies/abc", "/movies/%FF"] {
            let (status, body) = send(app(store.clone()), Method::DELETE, uri).await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, json!({"error": "Internal server error"}));
        }

        assert!(store.get_movie(1234).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn get_with_repeated_cast_key_skips_the_join() {
        let (status, body) =
            send(app(seeded_store().await), Method::GET, "/movies/1234?cast=true&cast=true").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["movie"]["title"], "Alien");
        assert!(body.get("cast").is_none());
    }

    #[tokio::test]
    async fn get_with_undecodable_id_is_json_bad_request() {
        let (status, body) = send(app(seeded_store().await), Method::GET, "/movies/%FF").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "Invalid movieId. Must be a number."}));
    }

    #[tokio::test]
    async fn store_failures_are_generic_server_errors() {
        for (method, uri) in [
            (Method::GET, "/movies/1234"),
            (Method::GET, "/movies/1234?cast=true"),
            (Method::DELETE, "/movies/1234"),
        ] {
            let (status, body) = send(app(BrokenStore), method, uri).await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, json!({"error": "Internal server error"}));
            assert!(!body.to_string().contains("arn:aws"));
        }
    }

    #[tokio::test]
    async fn cast_index_failure_fails_the_whole_request() {
        let store = BrokenIndexStore(seeded_store().await);

        let (status, body) = send(app(store), Method::GET, "/movies/1234?cast=true").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"error": "Internal server error"}));
    }
}
