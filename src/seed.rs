use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use tracing::info;

use crate::{models::Item, store::MovieStore};

#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    pub movies: Vec<Item>,
    #[serde(default)]
    pub cast: Vec<Item>,
}

pub async fn load(path: &Path) -> anyhow::Result<SeedData> {
    let raw = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading seed file {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("parsing seed file {}", path.display()))
}

pub async fn apply(store: &dyn MovieStore, seed: SeedData) -> anyhow::Result<()> {
    let (movies, cast) = (seed.movies.len(), seed.cast.len());

    for movie in seed.movies {
        store.put_movie(movie).await.context("seeding movie")?;
    }
    for member in seed.cast {
        store.put_cast_member(member).await.context("seeding cast member")?;
    }

    info!(movies, cast, "seed data applied");
    Ok(())
}
