//! Catalog endpoints and configuration defaults.

// ═══════════════════════════════════════════════════════════════════════════════
// CATALOG API
// ═══════════════════════════════════════════════════════════════════════════════

/// Base URL of the public PokeAPI, version 2.
pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";

/// Path segment for location areas (paged listing and single-area lookups).
pub const LOCATION_AREA_PATH: &str = "location-area/";

/// Path segment for creature details.
pub const POKEMON_PATH: &str = "pokemon/";

/// Number of location areas listed per page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// HTTP request timeout in seconds.
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE
// ═══════════════════════════════════════════════════════════════════════════════

/// Staleness threshold and sweep period of the response cache, in seconds.
pub const DEFAULT_CACHE_INTERVAL_SECS: u64 = 20;

// ═══════════════════════════════════════════════════════════════════════════════
// CATCHING
// ═══════════════════════════════════════════════════════════════════════════════

/// Scale applied to an Exp(1) draw before comparing against base experience.
///
/// Higher base experience makes a creature harder to catch.
pub const CATCH_SCALE: f64 = 50.0;
