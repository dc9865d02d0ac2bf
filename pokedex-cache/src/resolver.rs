//! Cache-aside resolution in front of a TTL store.

use std::future::Future;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use pokedex_core::error::{PokedexError, Result};

use crate::codec::{Codec, JsonCodec};
use crate::key::CacheKey;
use crate::store::TtlStore;

/// Resolver configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Let concurrent misses on one key share a single fetch
    pub single_flight: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            single_flight: true,
        }
    }
}

impl ResolverConfig {
    /// Every miss runs its own fetch; the last write wins.
    pub fn without_single_flight(mut self) -> Self {
        self.single_flight = false;
        self
    }
}

/// A resolved value and where it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resolved<T> {
    /// The value
    pub value: T,
    /// Whether it was decoded from the store rather than fetched by this call
    pub from_cache: bool,
}

/// Per-key locks held while a fetch is in flight.
type InFlight = DashMap<String, Arc<tokio::sync::Mutex<()>>>;

/// A caller's place in the queue for one key.
///
/// Dropping it, including when the resolve future is cancelled, removes the
/// key's lock from the map once no other caller holds it.
struct InFlightSlot<'a> {
    in_flight: &'a InFlight,
    key: &'a str,
    lock: Arc<tokio::sync::Mutex<()>>,
}

impl<'a> InFlightSlot<'a> {
    fn join(in_flight: &'a InFlight, key: &'a str) -> Self {
        let lock = in_flight.entry(key.to_owned()).or_default().value().clone();
        Self {
            in_flight,
            key,
            lock,
        }
    }
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        // The map and this slot hold the only references: nobody else is queued.
        self.in_flight.remove_if(self.key, |_, lock| {
            Arc::ptr_eq(lock, &self.lock) && Arc::strong_count(lock) == 2
        });
    }
}

/// Cache-aside resolver.
///
/// Checks the store first; on a miss runs the caller's fetch, encodes the
/// result into the store, and returns it unchanged.
///
/// # Failure handling
///
/// - Fetch errors are returned as-is and nothing is cached.
/// - A payload that fails to decode is reported as
///   [`PokedexError::CacheCorruption`], never treated as a miss.
/// - A fetched value that fails to encode is reported as
///   [`PokedexError::CacheEncode`].
///
/// # Single-flight
///
/// With [`ResolverConfig::single_flight`] set, concurrent misses on the same key
/// queue behind one fetch and read its result from the store. A failed fetch is
/// not shared: the next caller in the queue fetches for itself.
pub struct Resolver<C = JsonCodec> {
    store: Arc<TtlStore>,
    codec: C,
    in_flight: Option<InFlight>,
}

impl Resolver<JsonCodec> {
    /// Creates a JSON resolver with default configuration.
    pub fn new(store: Arc<TtlStore>) -> Self {
        Self::with_codec(store, JsonCodec, ResolverConfig::default())
    }

    /// Creates a JSON resolver with custom configuration.
    pub fn with_config(store: Arc<TtlStore>, config: ResolverConfig) -> Self {
        Self::with_codec(store, JsonCodec, config)
    }
}

impl<C> Resolver<C> {
    /// Creates a resolver with a custom codec.
    pub fn with_codec(store: Arc<TtlStore>, codec: C, config: ResolverConfig) -> Self {
        Self {
            store,
            codec,
            in_flight: config.single_flight.then(DashMap::new),
        }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &Arc<TtlStore> {
        &self.store
    }

    /// Returns the cached value for `key`, or fetches and caches it.
    pub async fn resolve<T, F, Fut>(&self, key: &CacheKey<T>, fetch: F) -> Result<T>
    where
        C: Codec<T>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        Ok(self.resolve_traced(key, fetch).await?.value)
    }

    /// Like [`resolve`](Self::resolve), also reporting whether the store served it.
    #[instrument(skip(self, key, fetch), fields(key = %key))]
    pub async fn resolve_traced<T, F, Fut>(&self, key: &CacheKey<T>, fetch: F) -> Result<Resolved<T>>
    where
        C: Codec<T>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let Some(value) = self.lookup(key)? {
            debug!("Cache hit");
            return Ok(Resolved {
                value,
                from_cache: true,
            });
        }

        let Some(in_flight) = &self.in_flight else {
            return self.fetch_and_store(key, fetch).await;
        };

        let slot = InFlightSlot::join(in_flight, key.as_str());
        let _turn = slot.lock.lock().await;

        // Another caller may have filled the entry while we queued.
        match self.lookup(key)? {
            Some(value) => {
                debug!("Shared in-flight fetch");
                Ok(Resolved {
                    value,
                    from_cache: true,
                })
            }
            None => self.fetch_and_store(key, fetch).await,
        }
    }

    fn lookup<T>(&self, key: &CacheKey<T>) -> Result<Option<T>>
    where
        C: Codec<T>,
    {
        let Some(payload) = self.store.get(key.as_str()) else {
            return Ok(None);
        };

        self.codec
            .decode(&payload)
            .map(Some)
            .map_err(|e| PokedexError::CacheCorruption {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    async fn fetch_and_store<T, F, Fut>(&self, key: &CacheKey<T>, fetch: F) -> Result<Resolved<T>>
    where
        C: Codec<T>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        debug!("Cache miss, fetching");
        let value = fetch().await?;

        let encoded = self
            .codec
            .encode(&value)
            .map_err(|e| PokedexError::CacheEncode {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        self.store.add(key.as_str(), encoded);

        Ok(Resolved {
            value,
            from_cache: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::BincodeCodec;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    struct Count {
        count: u32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    struct Other {
        label: String,
    }

    const INTERVAL: Duration = Duration::from_secs(1);

    fn store() -> Arc<TtlStore> {
        Arc::new(TtlStore::new(INTERVAL).unwrap())
    }

    #[tokio::test(start_paused = true)]
    async fn test_scenario_cold_then_cached() {
        let resolver = Resolver::new(store());
        let key = CacheKey::<Count>::new("counts");

        let first = resolver.resolve(&key, || async { Ok(Count { count: 7 }) }).await.unwrap();
        assert_eq!(first, Count { count: 7 });

        let stored = resolver.store().get("counts").unwrap();
        assert_eq!(&stored[..], br#"{"count":7}"#);

        let second = resolver
            .resolve_traced(&key, || async { Ok(Count { count: 8 }) })
            .await
            .unwrap();
        assert_eq!(second.value, Count { count: 7 });
        assert!(second.from_cache);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_not_cached() {
        let resolver = Resolver::new(store());
        let key = CacheKey::<Count>::new("counts");

        let err = resolver
            .resolve(&key, || async {
                Err(PokedexError::HttpStatus {
                    url: "https://pokeapi.co/api/v2/pokemon/missingno".into(),
                    status: 404,
                    body: "Not Found".into(),
                })
            })
            .await
            .unwrap_err();
        assert!(matches!(err, PokedexError::HttpStatus { status: 404, .. }));
        assert!(resolver.store().is_empty());

        let fetched = resolver
            .resolve_traced(&key, || async { Ok(Count { count: 1 }) })
            .await
            .unwrap();
        assert!(!fetched.from_cache);
    }

    #[tokio::test(start_paused = true)]
    async fn test_incompatible_payload_is_corruption() {
        let resolver = Resolver::new(store());
        resolver
            .resolve(&CacheKey::<Other>::new("shared"), || async {
                Ok(Other { label: "area".into() })
            })
            .await
            .unwrap();

        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let err = resolver
            .resolve(&CacheKey::<Count>::new("shared"), || async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Count { count: 1 })
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PokedexError::CacheCorruption { ref key, .. } if key == "shared"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetch_after_eviction() {
        let resolver = Resolver::new(store());
        let key = CacheKey::<Count>::new("counts");
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let fetch = || async move {
            let n = counter.fetch_add(1, Ordering::SeqCst) as u32;
            Ok(Count { count: n })
        };

        assert_eq!(resolver.resolve(&key, fetch).await.unwrap().count, 0);
        assert_eq!(resolver.resolve(&key, fetch).await.unwrap().count, 0);

        tokio::time::advance(INTERVAL * 3).await;
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }

        assert_eq!(resolver.resolve(&key, fetch).await.unwrap().count, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_flight_shares_fetch() {
        let resolver = Arc::new(Resolver::new(store()));
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let resolver = Arc::clone(&resolver);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    let key = CacheKey::<Count>::new("area/1");
                    resolver
                        .resolve(&key, || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(100)).await;
                            Ok(Count { count: 3 })
                        })
                        .await
                })
            })
            .collect();

        for result in futures::future::join_all(tasks).await {
            assert_eq!(result.unwrap().unwrap(), Count { count: 3 });
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(resolver.in_flight.as_ref().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_without_single_flight_each_miss_fetches() {
        let resolver = Arc::new(Resolver::with_config(
            store(),
            ResolverConfig::default().without_single_flight(),
        ));
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..4u32)
            .map(|i| {
                let resolver = Arc::clone(&resolver);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    let key = CacheKey::<Count>::new("area/1");
                    resolver
                        .resolve(&key, || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(100)).await;
                            Ok(Count { count: i })
                        })
                        .await
                })
            })
            .collect();

        for result in futures::future::join_all(tasks).await {
            result.unwrap().unwrap();
        }
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(resolver.store().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_resolve_releases_key() {
        let resolver = Resolver::new(store());
        let key = CacheKey::<Count>::new("slow");

        let cancelled = tokio::time::timeout(
            Duration::from_millis(10),
            resolver.resolve(&key, || std::future::pending::<Result<Count>>()),
        )
        .await;
        assert!(cancelled.is_err());
        assert!(resolver.in_flight.as_ref().unwrap().is_empty());

        let value = resolver.resolve(&key, || async { Ok(Count { count: 2 }) }).await.unwrap();
        assert_eq!(value.count, 2);
        assert!(resolver.in_flight.as_ref().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_flight_failure_not_shared() {
        let resolver = Arc::new(Resolver::new(store()));
        let calls = Arc::new(AtomicUsize::new(0));

        let tasks: Vec<_> = (0..2)
            .map(|_| {
                let resolver = Arc::clone(&resolver);
                let calls = Arc::clone(&calls);
                tokio::spawn(async move {
                    let key = CacheKey::<Count>::new("flaky");
                    resolver
                        .resolve(&key, || async move {
                            let attempt = calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            if attempt == 0 {
                                Err(PokedexError::HttpError("connection reset".into()))
                            } else {
                                Ok(Count { count: 9 })
                            }
                        })
                        .await
                })
            })
            .collect();

        let results: Vec<_> = futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 1);
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bincode_resolver() {
        let resolver = Resolver::with_codec(store(), BincodeCodec, ResolverConfig::default());
        let key = CacheKey::<Vec<String>>::new("names");

        let names = vec!["pidgey".to_string(), "rattata".to_string()];
        let fetched = names.clone();
        assert_eq!(resolver.resolve(&key, move || async move { Ok(fetched) }).await.unwrap(), names);

        let cached = resolver
            .resolve_traced(&key, || async { Ok(Vec::new()) })
            .await
            .unwrap();
        assert!(cached.from_cache);
        assert_eq!(cached.value, names);
    }
}
