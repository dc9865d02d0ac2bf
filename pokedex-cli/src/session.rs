//! REPL session state and command handlers.

use std::fmt::Write as _;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, instrument};

use pokedex_api::CachedCatalog;
use pokedex_core::error::{PokedexError, Result};
use pokedex_core::traits::CatalogClient;
use pokedex_core::types::LocationAreaPage;
use pokedex_registry::{catch_roll, Pokedex};

use crate::commands::{CommandKind, CommandRegistry, CommandSpec};

/// What the REPL should do after a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    /// Print this text
    Text(String),
    /// Print nothing
    Silent,
    /// Leave the loop
    Exit,
}

/// One interactive session: catalog, pokedex, command table, paging cursor.
pub struct Session<C> {
    catalog: CachedCatalog<C>,
    pokedex: Pokedex,
    commands: CommandRegistry,
    next: Option<String>,
    previous: Option<String>,
    rng: StdRng,
}

impl<C: CatalogClient> Session<C> {
    /// Creates a session positioned before the first page.
    pub fn new(catalog: CachedCatalog<C>, pokedex: Pokedex, commands: CommandRegistry) -> Self {
        let first = catalog.client().first_page_url();
        Self {
            catalog,
            pokedex,
            commands,
            next: Some(first),
            previous: None,
            rng: StdRng::from_entropy(),
        }
    }

    /// Replaces the random source used for catch rolls.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Returns the command spec an input line dispatches to, if any.
    pub fn command_for(&self, line: &str) -> Option<&CommandSpec> {
        let word = line.split_whitespace().next()?;
        self.commands.lookup(&word.to_lowercase())
    }

    /// Progress line to show before a slow command runs, if it has one.
    pub fn announce(&self, line: &str) -> Option<String> {
        let mut words = line.split_whitespace();
        let spec = self.commands.lookup(&words.next()?.to_lowercase())?;
        match (spec.kind, words.next(), words.next()) {
            (CommandKind::Explore, Some(area), None) => Some(format!("Exploring {}...", area)),
            _ => None,
        }
    }

    /// Parses and runs one input line.
    #[instrument(skip(self))]
    pub async fn execute(&mut self, line: &str) -> Result<Reply> {
        let mut words = line.split_whitespace();
        let Some(word) = words.next() else {
            return Ok(Reply::Silent);
        };
        let args: Vec<&str> = words.collect();

        let spec = *self
            .commands
            .lookup(&word.to_lowercase())
            .ok_or_else(|| PokedexError::UnknownCommand(word.to_string()))?;
        debug!(command = spec.name, ?args, "Dispatching");

        match spec.kind {
            CommandKind::Help => Ok(Reply::Text(self.commands.help_text())),
            CommandKind::Exit => Ok(Reply::Exit),
            CommandKind::Map => self.map_forward().await,
            CommandKind::MapBack => self.map_back().await,
            CommandKind::Explore => self.explore(single_arg(&spec, &args)?).await,
            CommandKind::Catch => self.catch(single_arg(&spec, &args)?).await,
            CommandKind::Inspect => self.inspect(single_arg(&spec, &args)?),
            CommandKind::Pokedex => Ok(self.list_pokedex()),
            CommandKind::Cache => Ok(self.cache_stats()),
        }
    }

    async fn map_forward(&mut self) -> Result<Reply> {
        let url = self
            .next
            .clone()
            .ok_or_else(|| PokedexError::NoPage("You're on the last page.".into()))?;
        self.show_page(&url).await
    }

    async fn map_back(&mut self) -> Result<Reply> {
        let url = self
            .previous
            .clone()
            .ok_or_else(|| PokedexError::NoPage("You're on the first page.".into()))?;
        self.show_page(&url).await
    }

    async fn show_page(&mut self, url: &str) -> Result<Reply> {
        let page = self.catalog.location_page(Some(url)).await?;
        let offset = LocationAreaPage::offset_of(url)?;

        self.next = page.next.clone();
        self.previous = page.previous.clone();

        let mut text = String::new();
        for area in &page.results {
            let _ = writeln!(text, "{}", area.name);
        }
        if page.results.is_empty() {
            text.push_str("No location areas on this page.");
        } else {
            let last = offset + page.results.len() as u32 - 1;
            let _ = write!(text, "Results from {} to {} of {}", offset, last, page.count);
        }
        Ok(Reply::Text(text))
    }

    async fn explore(&mut self, area: &str) -> Result<Reply> {
        let pokemon = self.catalog.area_pokemon(area).await?;

        if pokemon.is_empty() {
            return Ok(Reply::Text("No pokemon found.".into()));
        }

        let mut text = String::from("Found Pokemon:");
        for p in &pokemon {
            let _ = write!(text, "\n - {}", p.name);
        }
        Ok(Reply::Text(text))
    }

    async fn catch(&mut self, name: &str) -> Result<Reply> {
        let details = self.catalog.pokemon(name).await?;
        let level = details.level();

        let mut text = format!("Throwing a Pokeball at {}...\n", details.name);
        if catch_roll(&mut self.rng, level) {
            let _ = write!(text, "Caught a lvl {} {}!", level, details.name);
            self.pokedex.insert(details);
            text.push_str("\nYou may now inspect it with the inspect command.");
        } else {
            let _ = write!(text, "A lvl {} {} escaped!", level, details.name);
        }
        Ok(Reply::Text(text))
    }

    fn inspect(&self, name: &str) -> Result<Reply> {
        let details = self.pokedex.inspect(name)?;
        Ok(Reply::Text(details.to_string()))
    }

    fn list_pokedex(&self) -> Reply {
        let caught = self.pokedex.list();
        if caught.is_empty() {
            return Reply::Text("Your Pokedex is empty.".into());
        }

        let mut text = String::from("Your Pokedex:");
        for entry in caught {
            let _ = write!(text, "\n - {}", entry.details.name);
        }
        Reply::Text(text)
    }

    fn cache_stats(&self) -> Reply {
        let stats = self.catalog.store().stats();
        Reply::Text(format!(
            "Cache: {} entries ({} stale), {} sweeps, {} evicted, interval {:?}",
            stats.total_entries, stats.stale_entries, stats.sweeps, stats.evicted, stats.interval
        ))
    }
}

fn single_arg<'a>(spec: &CommandSpec, args: &[&'a str]) -> Result<&'a str> {
    match args {
        [arg] => Ok(arg),
        _ => Err(PokedexError::Usage(spec.usage.to_string())),
    }
}
