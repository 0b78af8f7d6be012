mod config;
mod db;
mod entities;
mod error;
mod models;
mod routes;
mod seed;
mod store;

use std::sync::Arc;

use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, store::MovieStore};

pub struct AppState {
    pub store: Arc<dyn MovieStore>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,movie_catalog=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Config::from_env()?;

    let store = store::connect(&config).await?;

    if let Some(path) = &config.seed_path {
        let data = seed::load(path).await?;
        seed::apply(store.as_ref(), data).await?;
    }

    let state = Arc::new(AppState { store });

    let app = routes::router(state)
        .layer(CorsLayer::new().allow_origin(Any).allow_headers(Any).allow_methods(Any))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, backend = ?config.backend, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
