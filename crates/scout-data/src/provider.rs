// Sources of raw season data: the live HTTP API or a saved snapshot.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::api::{BootstrapStatic, RawFixture, DEFAULT_BOOTSTRAP_URL, DEFAULT_FIXTURES_URL};
use crate::error::DataError;

pub const BOOTSTRAP_FILE: &str = "bootstrap-static.json";
pub const FIXTURES_FILE: &str = "fixtures.json";

/// Where the pipeline gets its raw data from.
#[async_trait]
pub trait DataProvider: Send + Sync {
    async fn bootstrap(&self) -> Result<BootstrapStatic, DataError>;
    async fn fixtures(&self) -> Result<Vec<RawFixture>, DataError>;
}

/// Fetch both documents concurrently.
pub async fn fetch_all<P: DataProvider + ?Sized>(
    provider: &P,
) -> Result<(BootstrapStatic, Vec<RawFixture>), DataError> {
    tokio::try_join!(provider.bootstrap(), provider.fixtures())
}

// ---------------------------------------------------------------------------
// HTTP
// ---------------------------------------------------------------------------

/// The game's public JSON API.
pub struct HttpProvider {
    http: reqwest::Client,
    bootstrap_url: String,
    fixtures_url: String,
}

impl HttpProvider {
    pub fn new(bootstrap_url: impl Into<String>, fixtures_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            bootstrap_url: bootstrap_url.into(),
            fixtures_url: fixtures_url.into(),
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, DataError> {
        debug!("GET {}", url);
        let response = self.http.get(url).send().await.map_err(|e| DataError::Http {
            url: url.to_string(),
            source: e,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DataError::Unavailable(format!("{url} returned {status}")));
        }

        let body = response.text().await.map_err(|e| DataError::Http {
            url: url.to_string(),
            source: e,
        })?;
        parse_body(&body, url)
    }
}

impl Default for HttpProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BOOTSTRAP_URL, DEFAULT_FIXTURES_URL)
    }
}

#[async_trait]
impl DataProvider for HttpProvider {
    async fn bootstrap(&self) -> Result<BootstrapStatic, DataError> {
        let data: BootstrapStatic = self.get_json(&self.bootstrap_url).await?;
        info!(
            "fetched {} players, {} clubs from the API",
            data.elements.len(),
            data.teams.len()
        );
        Ok(data)
    }

    async fn fixtures(&self) -> Result<Vec<RawFixture>, DataError> {
        let fixtures: Vec<RawFixture> = self.get_json(&self.fixtures_url).await?;
        info!("fetched {} fixtures from the API", fixtures.len());
        Ok(fixtures)
    }
}

// ---------------------------------------------------------------------------
// Snapshot directory
// ---------------------------------------------------------------------------

/// A directory holding `bootstrap-static.json` and `fixtures.json`, for
/// offline runs.
pub struct SnapshotProvider {
    dir: PathBuf,
}

impl SnapshotProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    async fn read_json<T: DeserializeOwned>(&self, file: &str) -> Result<T, DataError> {
        let path = self.dir.join(file);
        let body = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| DataError::Io {
                path: path.display().to_string(),
                source: e,
            })?;
        parse_body(&body, &path.display().to_string())
    }
}

#[async_trait]
impl DataProvider for SnapshotProvider {
    async fn bootstrap(&self) -> Result<BootstrapStatic, DataError> {
        self.read_json(BOOTSTRAP_FILE).await
    }

    async fn fixtures(&self) -> Result<Vec<RawFixture>, DataError> {
        self.read_json(FIXTURES_FILE).await
    }
}

fn parse_body<T: DeserializeOwned>(body: &str, what: &str) -> Result<T, DataError> {
    if body.trim().is_empty() {
        return Err(DataError::Unavailable(format!("{what} returned an empty body")));
    }
    serde_json::from_str(body).map_err(|e| DataError::Json {
        what: what.to_string(),
        source: e,
    })
}
