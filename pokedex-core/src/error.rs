//! Error types for the pokedex.
//!
//! One error hierarchy built with `thiserror`, shared by the cache, the catalog
//! client, the registry, and the REPL. Nothing in library code terminates the
//! process; every failure comes back to the caller as a `PokedexError`.

use thiserror::Error;

/// Result type alias using `PokedexError`.
pub type Result<T> = std::result::Result<T, PokedexError>;

/// Main error type for all pokedex operations.
#[derive(Debug, Error)]
pub enum PokedexError {
    // ═══════════════════════════════════════════════════════════════════════════
    // CACHE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Store or resolver configuration rejected at construction.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A cached payload could not be decoded into the requested type.
    ///
    /// The same key was used for two incompatible value types. This is a
    /// programming error, never a cache miss.
    #[error("Cache entry '{key}' is corrupt: {reason}")]
    CacheCorruption { key: String, reason: String },

    /// A freshly fetched value could not be encoded for caching.
    #[error("Failed to encode value for cache key '{key}': {reason}")]
    CacheEncode { key: String, reason: String },

    /// The store was constructed outside of a Tokio runtime, so its sweep task
    /// cannot be started.
    #[error("No async runtime available to run the cache sweep task")]
    RuntimeUnavailable,

    // ═══════════════════════════════════════════════════════════════════════════
    // FETCH ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Transport-level HTTP failure (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// The catalog API answered with a non-success status.
    #[error("Request to {url} failed with status {status}: {body}")]
    HttpStatus { url: String, status: u16, body: String },

    /// The response body did not match the expected schema.
    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// A URL could not be built or parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // REPL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// The typed word is not a registered command.
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    /// A command was called with the wrong arguments.
    #[error("usage: {0}")]
    Usage(String),

    /// There is no page in the requested direction.
    #[error("{0}")]
    NoPage(String),

    /// The creature is not in the pokedex.
    #[error("Didn't catch any {0}")]
    NotCaught(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONVERSIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// I/O error (terminal input/output).
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl PokedexError {
    /// Returns true if this error came from the fetch collaborator.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            PokedexError::HttpError(_)
                | PokedexError::HttpStatus { .. }
                | PokedexError::Decode { .. }
                | PokedexError::InvalidUrl(_)
        )
    }

    /// Returns true if retrying the same operation later may succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            PokedexError::HttpError(_) => true,
            PokedexError::HttpStatus { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Returns true if this error was raised by the cache layer itself.
    pub fn is_cache_error(&self) -> bool {
        matches!(
            self,
            PokedexError::InvalidConfig(_)
                | PokedexError::CacheCorruption { .. }
                | PokedexError::CacheEncode { .. }
                | PokedexError::RuntimeUnavailable
        )
    }
}
