//! In-memory pokedex.
//!
//! Thread-safe storage of caught creatures, keyed by name.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use pokedex_core::error::{PokedexError, Result};
use pokedex_core::types::PokemonDetails;

/// A creature in the pokedex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaughtPokemon {
    /// Details as fetched when it was caught
    pub details: PokemonDetails,
    /// When it was caught
    pub caught_at: DateTime<Utc>,
}

/// In-memory registry of caught creatures.
///
/// Catching the same creature again replaces the earlier record.
#[derive(Debug, Default)]
pub struct Pokedex {
    caught: DashMap<String, CaughtPokemon>,
}

impl Pokedex {
    /// Creates an empty pokedex.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a caught creature.
    ///
    /// Returns true if it was not in the pokedex before.
    #[instrument(skip(self, details), fields(name = %details.name))]
    pub fn insert(&self, details: PokemonDetails) -> bool {
        let name = details.name.clone();
        let entry = CaughtPokemon {
            details,
            caught_at: Utc::now(),
        };
        let is_new = self.caught.insert(name, entry).is_none();
        debug!(is_new, "Recorded catch");
        is_new
    }

    /// Returns a caught creature by name.
    pub fn get(&self, name: &str) -> Option<CaughtPokemon> {
        self.caught.get(name).map(|entry| entry.value().clone())
    }

    /// Returns the details of a caught creature, or `NotCaught`.
    pub fn inspect(&self, name: &str) -> Result<PokemonDetails> {
        self.get(name)
            .map(|caught| caught.details)
            .ok_or_else(|| PokedexError::NotCaught(name.to_string()))
    }

    /// Returns true if the creature has been caught.
    pub fn contains(&self, name: &str) -> bool {
        self.caught.contains_key(name)
    }

    /// Returns every caught creature, sorted by name.
    pub fn list(&self) -> Vec<CaughtPokemon> {
        let mut all: Vec<_> = self.caught.iter().map(|entry| entry.value().clone()).collect();
        all.sort_by(|a, b| a.details.name.cmp(&b.details.name));
        all
    }

    /// Returns the number of caught creatures.
    pub fn len(&self) -> usize {
        self.caught.len()
    }

    /// Returns true if nothing has been caught yet.
    pub fn is_empty(&self) -> bool {
        self.caught.is_empty()
    }
}
