//! Response cache for the pokedex.
//!
//! Two layers, read bottom-up:
//!
//! - [`TtlStore`]: string keys to byte payloads, each stamped with its insertion
//!   time. A background task sweeps out entries older than the configured
//!   interval until the store is stopped or dropped.
//! - [`Resolver`]: cache-aside lookups. On a hit the payload is decoded with a
//!   [`Codec`]; on a miss the caller's fetch runs and its result is encoded into
//!   the store.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use pokedex_cache::{CacheKey, Resolver, TtlStore};
//!
//! # async fn demo() -> pokedex_core::Result<()> {
//! let store = Arc::new(TtlStore::new(Duration::from_secs(20))?);
//! let resolver = Resolver::new(Arc::clone(&store));
//!
//! let key = CacheKey::<u32>::new("answer");
//! let value = resolver.resolve(&key, || async { Ok(42) }).await?;
//! assert_eq!(value, 42);
//!
//! store.shutdown().await;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod codec;
mod key;
mod resolver;
mod store;

pub use codec::{BincodeCodec, Codec, CodecError, JsonCodec};
pub use key::CacheKey;
pub use resolver::{Resolved, Resolver, ResolverConfig};
pub use store::{StoreConfig, StoreStats, TtlStore};
