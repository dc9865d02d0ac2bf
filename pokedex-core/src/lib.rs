//! # Pokedex Core
//!
//! Core types, errors, and traits shared by every pokedex crate.
//!
//! - **Types**: catalog records decoded from the PokeAPI (location areas, creatures)
//! - **Errors**: one error enum covering cache, fetch, and REPL failures
//! - **Constants**: endpoint paths and configuration defaults
//! - **Traits**: the `CatalogClient` seam between the cache layer and the HTTP client
//!
//! ## Example
//!
//! ```rust
//! use pokedex_core::{NamedResource, PokedexError};
//!
//! let area = NamedResource::new("canalave-city-area", "https://pokeapi.co/api/v2/location-area/1/");
//! let json = serde_json::to_string(&area).unwrap();
//! assert!(json.contains("canalave"));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;

pub use constants::*;
pub use error::{PokedexError, Result};
pub use traits::*;
pub use types::*;
