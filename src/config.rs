use std::{net::SocketAddr, path::PathBuf, str::FromStr};

use anyhow::Context;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StoreBackend {
    Dynamo,
    Sqlite,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dynamodb" | "dynamo" => Ok(Self::Dynamo),
            "sqlite" => Ok(Self::Sqlite),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!("unknown store backend `{other}`"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub addr: SocketAddr,
    pub backend: StoreBackend,
    pub table_name: Option<String>,
    pub region: Option<String>,
    pub cast_index_name: String,
    pub dynamodb_endpoint: Option<String>,
    pub database_url: String,
    pub seed_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        // Blank values count as unset.
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port: u16 = var("PORT").unwrap_or_else(|| "3000".to_string()).parse().context("PORT")?;

        let backend: StoreBackend = var("STORE_BACKEND")
            .unwrap_or_else(|| "dynamodb".to_string())
            .parse()
            .context("STORE_BACKEND")?;

        let table_name = var("TABLE_NAME");
        if backend == StoreBackend::Dynamo && table_name.is_none() {
            anyhow::bail!("TABLE_NAME must be set when STORE_BACKEND is dynamodb");
        }

        Ok(Self {
            addr: format!("{host}:{port}").parse().context("HOST/PORT")?,
            backend,
            table_name,
            region: var("REGION"),
            cast_index_name: var("CAST_INDEX_NAME").unwrap_or_else(|| "movieId-index".to_string()),
            dynamodb_endpoint: var("DYNAMODB_ENDPOINT"),
            database_url: var("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://movies.db?mode=rwc".to_string()),
            seed_path: var("MOVIE_SEED_PATH").map(PathBuf::from),
        })
    }
}
