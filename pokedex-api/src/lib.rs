//! # Pokedex API
//!
//! Access to the remote PokeAPI catalog.
//!
//! - [`PokeApiClient`]: one HTTP GET and JSON decode per call
//! - [`CachedCatalog`]: the same lookups behind the TTL cache, keyed by request URL

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cached;
mod client;

pub use cached::CachedCatalog;
pub use client::{ClientConfig, PokeApiClient};
