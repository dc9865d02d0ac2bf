//! Pokedex CLI
//!
//! Interactive explorer for the PokeAPI location and creature catalog.

mod commands;
mod repl;
mod session;

use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pokedex_api::{CachedCatalog, ClientConfig, PokeApiClient};
use pokedex_cache::{Resolver, ResolverConfig, StoreConfig, TtlStore};
use pokedex_core::constants::{
    DEFAULT_BASE_URL, DEFAULT_CACHE_INTERVAL_SECS, DEFAULT_HTTP_TIMEOUT_SECS, DEFAULT_PAGE_SIZE,
};
use pokedex_registry::Pokedex;

use crate::commands::CommandRegistry;
use crate::session::{Reply, Session};

/// Pokedex - explore the PokeAPI from your terminal
#[derive(Parser)]
#[command(name = "pokedex")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Seconds a cached response stays fresh
    #[arg(
        long,
        env = "POKEDEX_CACHE_INTERVAL_SECS",
        default_value_t = DEFAULT_CACHE_INTERVAL_SECS,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    cache_interval_secs: u64,

    /// API root
    #[arg(long, env = "POKEAPI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Location areas per page
    #[arg(
        long,
        env = "POKEDEX_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    page_size: u32,

    /// HTTP request timeout in seconds
    #[arg(long, env = "POKEDEX_HTTP_TIMEOUT_SECS", default_value_t = DEFAULT_HTTP_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Let concurrent lookups of the same key each fetch
    #[arg(long)]
    no_single_flight: bool,

    /// Run one command and exit instead of starting the prompt
    #[arg(trailing_var_arg = true)]
    command: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "pokedex=debug,info"
    } else {
        "pokedex=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let store = Arc::new(
        TtlStore::with_config(
            StoreConfig::default().with_interval(Duration::from_secs(cli.cache_interval_secs)),
        )
        .context("Failed to start response cache")?,
    );

    let client = PokeApiClient::with_config(
        ClientConfig::new(&cli.base_url)
            .with_page_size(cli.page_size)
            .with_timeout(cli.timeout_secs),
    )
    .context("Failed to build HTTP client")?;

    let resolver_config = if cli.no_single_flight {
        ResolverConfig::default().without_single_flight()
    } else {
        ResolverConfig::default()
    };
    let catalog = CachedCatalog::new(client, Resolver::with_config(Arc::clone(&store), resolver_config));
    let mut session = Session::new(catalog, Pokedex::new(), CommandRegistry::standard());

    info!(
        base_url = %cli.base_url,
        interval_secs = cli.cache_interval_secs,
        "Pokedex ready"
    );

    let outcome = if cli.command.is_empty() {
        run_interactive(&mut session).await
    } else {
        run_once(&mut session, &cli.command.join(" ")).await
    };

    store.shutdown().await;
    outcome
}

async fn run_interactive(session: &mut Session<PokeApiClient>) -> Result<()> {
    let spinner = std::io::stdout().is_terminal();
    if spinner {
        println!("{}", "Welcome to the Pokedex! Type 'help' for commands.".cyan().bold());
    }

    let input = BufReader::new(tokio::io::stdin());
    let mut out = std::io::stdout();
    repl::run(session, input, &mut out, spinner).await
}

async fn run_once(session: &mut Session<PokeApiClient>, line: &str) -> Result<()> {
    if let Some(announcement) = session.announce(line) {
        println!("{}", announcement);
    }
    match session.execute(line).await? {
        Reply::Text(text) => println!("{}", text),
        Reply::Silent | Reply::Exit => {}
    }
    Ok(())
}
