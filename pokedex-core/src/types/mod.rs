//! Catalog records decoded from the PokeAPI.

mod location;
mod pokemon;

pub use location::*;
pub use pokemon::*;

use serde::{Deserialize, Serialize};

/// A named link to another catalog resource.
///
/// The API uses this shape everywhere a record points at another one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamedResource {
    /// Resource name (e.g. "pikachu", "canalave-city-area")
    pub name: String,
    /// Absolute URL of the resource
    pub url: String,
}

impl NamedResource {
    /// Creates a named resource link.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

impl std::fmt::Display for NamedResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
