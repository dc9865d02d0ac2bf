//! Catalog lookups behind the response cache.

use std::sync::Arc;

use tracing::{debug, instrument};

use pokedex_cache::{CacheKey, Resolver, TtlStore};
use pokedex_core::error::Result;
use pokedex_core::traits::CatalogClient;
use pokedex_core::types::{LocationAreaPage, NamedResource, PokemonDetails};

/// Cache-aside catalog.
///
/// Every lookup goes through the resolver, keyed by the exact URL the
/// underlying client requests. Keys are not normalized, so two spellings of
/// one URL are cached separately.
///
/// Area lookups cache the extracted creature list, not the raw area record.
pub struct CachedCatalog<C> {
    client: C,
    resolver: Resolver,
}

impl<C: CatalogClient> CachedCatalog<C> {
    /// Wraps a client with a resolver.
    pub fn new(client: C, resolver: Resolver) -> Self {
        Self { client, resolver }
    }

    /// Returns the wrapped client.
    pub fn client(&self) -> &C {
        &self.client
    }

    /// Returns the backing store.
    pub fn store(&self) -> &Arc<TtlStore> {
        self.resolver.store()
    }

    /// Returns a page of the location area listing.
    ///
    /// `None` requests the first page.
    #[instrument(skip(self))]
    pub async fn location_page(&self, url: Option<&str>) -> Result<LocationAreaPage> {
        let url = url.map_or_else(|| self.client.first_page_url(), str::to_owned);
        let key = CacheKey::<LocationAreaPage>::new(url.as_str());

        let resolved = self
            .resolver
            .resolve_traced(&key, || self.client.location_page(&url))
            .await?;
        debug!(from_cache = resolved.from_cache, "Location page resolved");
        Ok(resolved.value)
    }

    /// Returns the creatures that can be met in an area.
    #[instrument(skip(self))]
    pub async fn area_pokemon(&self, area: &str) -> Result<Vec<NamedResource>> {
        let key = CacheKey::<Vec<NamedResource>>::new(self.client.location_area_url(area));

        let resolved = self
            .resolver
            .resolve_traced(&key, || async {
                let area = self.client.location_area(area).await?;
                Ok(area.pokemon())
            })
            .await?;
        debug!(from_cache = resolved.from_cache, "Area resolved");
        Ok(resolved.value)
    }

    /// Returns creature details.
    #[instrument(skip(self))]
    pub async fn pokemon(&self, name: &str) -> Result<PokemonDetails> {
        let key = CacheKey::<PokemonDetails>::new(self.client.pokemon_url(name));

        let resolved = self
            .resolver
            .resolve_traced(&key, || self.client.pokemon(name))
            .await?;
        debug!(from_cache = resolved.from_cache, "Pokemon resolved");
        Ok(resolved.value)
    }
}
