//! HTTP client for the PokeAPI.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use pokedex_core::constants::{
    DEFAULT_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_PAGE_SIZE, LOCATION_AREA_PATH, POKEMON_PATH,
};
use pokedex_core::error::{PokedexError, Result};
use pokedex_core::traits::CatalogClient;
use pokedex_core::types::{LocationArea, LocationAreaPage, PokemonDetails};

/// Catalog client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root, e.g. "https://pokeapi.co/api/v2"
    pub base_url: String,
    /// Location areas per listing page
    pub page_size: u32,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_seconds: DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Creates a config for the given API root.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Sets the listing page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }
}

/// PokeAPI client.
///
/// Each call performs exactly one GET. Nothing is cached or retried here.
///
/// Resource names are percent-encoded as a single path segment, so a name can
/// never add path segments or a query string to the request URL.
#[derive(Clone, Debug)]
pub struct PokeApiClient {
    config: ClientConfig,
    base: Url,
    http_client: reqwest::Client,
}

impl PokeApiClient {
    /// Creates a client for the public PokeAPI.
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        if config.page_size == 0 {
            return Err(PokedexError::InvalidConfig("page size must be greater than zero".into()));
        }

        let base = Url::parse(&config.base_url)
            .map_err(|e| PokedexError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;
        if base.cannot_be_a_base() {
            return Err(PokedexError::InvalidUrl(format!("{}: not a base URL", config.base_url)));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| PokedexError::HttpError(e.to_string()))?;

        Ok(Self {
            config,
            base,
            http_client,
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Appends `segments` to the base URL, encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // Only fails for cannot-be-a-base URLs, rejected in `with_config`.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn resource_url(&self, collection: &str, name: &str) -> String {
        self.endpoint(&[collection.trim_end_matches('/'), name]).into()
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(url, "GET");

        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| PokedexError::HttpError(e.to_string()))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| PokedexError::HttpError(e.to_string()))?;

        if !status.is_success() {
            return Err(PokedexError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        serde_json::from_slice(&body).map_err(|e| PokedexError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl CatalogClient for PokeApiClient {
    fn first_page_url(&self) -> String {
        // The empty segment keeps the trailing slash the API redirects to.
        let mut url = self.endpoint(&[LOCATION_AREA_PATH.trim_end_matches('/'), ""]);
        url.set_query(Some(&format!("offset=0&limit={}", self.config.page_size)));
        url.into()
    }

    fn location_area_url(&self, name: &str) -> String {
        self.resource_url(LOCATION_AREA_PATH, name)
    }

    fn pokemon_url(&self, name: &str) -> String {
        self.resource_url(POKEMON_PATH, name)
    }

    #[instrument(skip(self))]
    async fn location_page(&self, url: &str) -> Result<LocationAreaPage> {
        self.get_json(url).await
    }

    #[instrument(skip(self))]
    async fn location_area(&self, name: &str) -> Result<LocationArea> {
        self.get_json(&self.location_area_url(name)).await
    }

    #[instrument(skip(self))]
    async fn pokemon(&self, name: &str) -> Result<PokemonDetails> {
        self.get_json(&self.pokemon_url(name)).await
    }
}
