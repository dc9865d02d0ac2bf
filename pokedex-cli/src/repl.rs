//! Read-eval-print loop.

use std::io::Write;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use pokedex_core::traits::CatalogClient;

use crate::session::{Reply, Session};

/// Prompt printed before every line.
pub const PROMPT: &str = "pokedex > ";

/// Runs commands from `input` until `exit` or end of input.
///
/// Command errors are printed and the loop continues. Only I/O failures on
/// `input` or `out` end it early.
pub async fn run<C, R, W>(session: &mut Session<C>, mut input: R, out: &mut W, spinner: bool) -> anyhow::Result<()>
where
    C: CatalogClient,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut buf = Vec::new();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        buf.clear();
        if input.read_until(b'\n', &mut buf).await? == 0 {
            debug!("End of input");
            writeln!(out)?;
            break;
        }
        // Invalid UTF-8 becomes U+FFFD and fails as an unknown command or name.
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');

        if let Some(announcement) = session.announce(line) {
            writeln!(out, "{}", announcement)?;
        }

        let progress = match session.command_for(line) {
            Some(spec) if spinner && spec.remote => Some(start_spinner(spec.name)),
            _ => None,
        };
        let result = session.execute(line).await;
        if let Some(progress) = progress {
            progress.finish_and_clear();
        }

        match result {
            Ok(Reply::Text(text)) => writeln!(out, "{}", text)?,
            Ok(Reply::Silent) => {}
            Ok(Reply::Exit) => {
                writeln!(out, "{}", "Closing the Pokedex... Goodbye!".cyan())?;
                break;
            }
            Err(e) => {
                if e.is_fetch_failure() {
                    warn!(error = %e, "Lookup failed");
                }
                writeln!(out, "{} {}", "Error:".red().bold(), e)?;
            }
        }
    }

    Ok(())
}

fn start_spinner(command: &str) -> ProgressBar {
    let progress = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        progress.set_style(style);
    }
    progress.set_message(format!("Running {}...", command));
    progress.enable_steady_tick(Duration::from_millis(80));
    progress
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use pokedex_api::CachedCatalog;
    use pokedex_cache::{Resolver, TtlStore};
    use pokedex_core::error::{PokedexError, Result};
    use pokedex_core::types::{LocationArea, LocationAreaPage, PokemonDetails};
    use pokedex_registry::Pokedex;

    use crate::commands::CommandRegistry;

    /// Catalog that is always unreachable.
    struct Offline;

    #[async_trait]
    impl CatalogClient for Offline {
        fn first_page_url(&self) -> String {
            "http://offline/location-area/?offset=0&limit=20".into()
        }

        fn location_area_url(&self, name: &str) -> String {
            format!("http://offline/location-area/{}", name)
        }

        fn pokemon_url(&self, name: &str) -> String {
            format!("http://offline/pokemon/{}", name)
        }

        async fn location_page(&self, _url: &str) -> Result<LocationAreaPage> {
            Err(PokedexError::HttpError("connection refused".into()))
        }

        async fn location_area(&self, _name: &str) -> Result<LocationArea> {
            Err(PokedexError::HttpError("connection refused".into()))
        }

        async fn pokemon(&self, _name: &str) -> Result<PokemonDetails> {
            Err(PokedexError::HttpError("connection refused".into()))
        }
    }

    async fn run_script(script: &[u8]) -> String {
        colored::control::set_override(false);

        let store = Arc::new(TtlStore::new(Duration::from_secs(60)).unwrap());
        let catalog = CachedCatalog::new(Offline, Resolver::new(store));
        let mut session = Session::new(catalog, Pokedex::new(), CommandRegistry::standard());

        let mut out = Vec::new();
        run(&mut session, script, &mut out, false).await.unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_errors_do_not_end_loop() {
        let out = run_script(b"fly\nmap\ninspect pikachu\nexit\npokedex\n").await;

        assert!(out.contains("Error: Unknown command: fly"));
        assert!(out.contains("connection refused"));
        assert!(out.contains("Error: Didn't catch any pikachu"));
        assert!(out.contains("Goodbye!"));
        // Nothing after exit runs.
        assert!(!out.contains("Your Pokedex is empty."));
    }

    #[tokio::test]
    async fn test_end_of_input_stops_cleanly() {
        let out = run_script(b"pokedex\n\n").await;

        assert_eq!(out.matches(PROMPT).count(), 3);
        assert!(out.contains("Your Pokedex is empty."));
        assert!(!out.contains("Goodbye!"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_is_reported() {
        let out = run_script(b"caf\xe9\r\npokedex").await;

        assert!(out.contains("Error: Unknown command: caf\u{FFFD}"));
        assert!(out.contains("Your Pokedex is empty."));
        assert_eq!(out.matches(PROMPT).count(), 3);
    }

    #[tokio::test]
    async fn test_explore_announced_before_lookup() {
        let out = run_script(b"explore canalave-city-area\n").await;

        let announced = out.find("Exploring canalave-city-area...").unwrap();
        let failed = out.find("connection refused").unwrap();
        assert!(announced < failed);
    }
}
