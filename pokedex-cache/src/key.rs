//! Typed cache keys.

use std::fmt;
use std::marker::PhantomData;

/// A cache key bound to the type of value cached under it.
///
/// The resolver only decodes a `CacheKey<T>` into `T`. The type is not part of
/// the stored key, so two keys with equal strings but different types share one
/// entry; callers must build key strings that identify the record type, such as
/// the request URL. Keys are compared byte for byte: no normalization (trailing
/// slashes, query order) happens.
pub struct CacheKey<T> {
    key: String,
    _value: PhantomData<fn() -> T>,
}

impl<T> CacheKey<T> {
    /// Creates a key for values of type `T`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            _value: PhantomData,
        }
    }

    /// Returns the raw key string.
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl<T> Clone for CacheKey<T> {
    fn clone(&self) -> Self {
        Self::new(self.key.clone())
    }
}

impl<T> fmt::Debug for CacheKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CacheKey").field(&self.key).finish()
    }
}

impl<T> fmt::Display for CacheKey<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

impl<T> PartialEq for CacheKey<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T> Eq for CacheKey<T> {}
