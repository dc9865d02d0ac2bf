//! Creature detail records.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::NamedResource;

/// Details of a single creature, as served by `pokemon/{name}`.
///
/// Only the fields the explorer displays are decoded; everything else in the
/// response is ignored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonDetails {
    /// Catalog identifier
    pub id: u32,
    /// Creature name
    pub name: String,
    /// Experience gained for defeating it; `null` for some event forms
    pub base_experience: Option<u32>,
    /// Height in decimetres
    #[serde(default)]
    pub height: u32,
    /// Weight in hectograms
    #[serde(default)]
    pub weight: u32,
    /// Base stats
    #[serde(default)]
    pub stats: Vec<PokemonStat>,
    /// Elemental types, ordered by slot
    #[serde(default)]
    pub types: Vec<PokemonType>,
}

impl PokemonDetails {
    /// Base experience, treating a missing value as zero.
    pub fn level(&self) -> u32 {
        self.base_experience.unwrap_or(0)
    }
}

impl fmt::Display for PokemonDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Height: {}", self.height)?;
        writeln!(f, "Weight: {}", self.weight)?;
        writeln!(f, "Stats:")?;
        for stat in &self.stats {
            writeln!(f, "  -{}: {}", stat.stat.name, stat.base_stat)?;
        }
        write!(f, "Types:")?;
        for ty in &self.types {
            write!(f, "\n  - {}", ty.kind.name)?;
        }
        Ok(())
    }
}

/// One base stat (hp, attack, ...).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonStat {
    /// Base value
    pub base_stat: u32,
    /// Effort points gained by defeating it
    #[serde(default)]
    pub effort: u32,
    /// Which stat
    pub stat: NamedResource,
}

/// One elemental type slot.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonType {
    /// Slot order, starting at 1
    pub slot: u32,
    /// The type
    #[serde(rename = "type")]
    pub kind: NamedResource,
}
