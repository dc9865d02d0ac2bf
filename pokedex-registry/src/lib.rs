//! Caught-creature registry for the pokedex.
//!
//! Lives in memory for the lifetime of the process.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod catch;
mod pokedex;

pub use catch::{catch_probability, catch_roll};
pub use pokedex::{CaughtPokemon, Pokedex};
