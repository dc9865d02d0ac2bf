//! Common traits for the pokedex.
//!
//! The catalog client is the seam between the cache layer and the network, so
//! the REPL and the cache can be exercised against an in-process fake.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{LocationArea, LocationAreaPage, PokemonDetails};

// ═══════════════════════════════════════════════════════════════════════════════
// CATALOG CLIENT TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Fetch-and-decode access to the remote creature catalog.
///
/// Every method performs one remote request; implementations do not cache and
/// do not retry. The URL builders return the exact URL the matching fetch
/// requests, which callers use as a cache key.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// URL of the first page of the location area listing.
    fn first_page_url(&self) -> String;

    /// URL of a single location area.
    fn location_area_url(&self, name: &str) -> String;

    /// URL of a single creature.
    fn pokemon_url(&self, name: &str) -> String;

    /// Fetches one page of the location area listing.
    async fn location_page(&self, url: &str) -> Result<LocationAreaPage>;

    /// Fetches a location area by name.
    async fn location_area(&self, name: &str) -> Result<LocationArea>;

    /// Fetches creature details by name.
    async fn pokemon(&self, name: &str) -> Result<PokemonDetails>;
}
