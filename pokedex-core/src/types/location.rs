//! Location area records.
//!
//! A location area is a region inside a game location where creatures can be
//! encountered. The API lists them in pages and serves each area individually.

use serde::{Deserialize, Serialize};
use url::Url;

use super::NamedResource;
use crate::error::{PokedexError, Result};

/// One page of the location area listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationAreaPage {
    /// Total number of location areas in the catalog
    pub count: u32,
    /// URL of the next page, `None` on the last page
    pub next: Option<String>,
    /// URL of the previous page, `None` on the first page
    pub previous: Option<String>,
    /// Areas on this page
    #[serde(default)]
    pub results: Vec<NamedResource>,
}

impl LocationAreaPage {
    /// Reads the `offset` query parameter of a page URL.
    ///
    /// A URL without an offset is the first page.
    pub fn offset_of(page_url: &str) -> Result<u32> {
        let url = Url::parse(page_url)
            .map_err(|e| PokedexError::InvalidUrl(format!("{}: {}", page_url, e)))?;

        match url.query_pairs().find(|(k, _)| k == "offset") {
            Some((_, value)) => value.parse().map_err(|_| {
                PokedexError::InvalidUrl(format!("{}: offset '{}' is not a number", page_url, value))
            }),
            None => Ok(0),
        }
    }
}

/// A single location area with its creature encounters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationArea {
    /// Catalog identifier
    pub id: u32,
    /// Area name
    pub name: String,
    /// Internal game index
    #[serde(default)]
    pub game_index: u32,
    /// Encounter methods and their rates per game version
    #[serde(default)]
    pub encounter_method_rates: Vec<EncounterMethodRate>,
    /// Enclosing location
    #[serde(default)]
    pub location: NamedResource,
    /// Localized names
    #[serde(default)]
    pub names: Vec<LocalizedName>,
    /// Creatures that can be met here
    #[serde(default)]
    pub pokemon_encounters: Vec<PokemonEncounter>,
}

impl LocationArea {
    /// Returns the creatures that can be encountered in this area.
    pub fn pokemon(&self) -> Vec<NamedResource> {
        self.pokemon_encounters
            .iter()
            .map(|encounter| encounter.pokemon.clone())
            .collect()
    }
}

impl std::fmt::Display for LocationArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

/// Rate of one encounter method across game versions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterMethodRate {
    /// Method, e.g. walk or surf
    pub encounter_method: NamedResource,
    /// Rate per game version
    #[serde(default)]
    pub version_details: Vec<EncounterVersionDetail>,
}

/// Encounter rate in one game version.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterVersionDetail {
    /// Chance of an encounter, in percent
    pub rate: u32,
    /// Game version
    pub version: NamedResource,
}

/// A name in a given language.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedName {
    /// Localized name
    pub name: String,
    /// Language of the name
    pub language: NamedResource,
}

/// A creature that can be met in an area.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonEncounter {
    /// The creature
    pub pokemon: NamedResource,
    /// Odds per game version
    #[serde(default)]
    pub version_details: Vec<VersionEncounterDetail>,
}

/// Encounter odds for a creature in one game version.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEncounterDetail {
    /// Game version
    pub version: NamedResource,
    /// Total chance across all encounters, in percent
    pub max_chance: u32,
    /// Individual encounters
    #[serde(default)]
    pub encounter_details: Vec<EncounterDetail>,
}

/// Level range, chance, and method of a single encounter.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterDetail {
    /// Lowest level met
    pub min_level: u32,
    /// Highest level met
    pub max_level: u32,
    /// Conditions that must hold, e.g. time of day
    #[serde(default)]
    pub condition_values: Vec<NamedResource>,
    /// Chance of this encounter, in percent
    pub chance: u32,
    /// Method used
    pub method: NamedResource,
}
