//! Bounded route cache keyed by quantized start/end coordinates
//!
//! Eviction is a whole-cache clear once the capacity is reached; there is no
//! per-entry recency tracking.

use std::collections::HashMap;

use log::debug;

use crate::common::{Point2D, PointKey};

/// Default number of cached routes
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

type CacheKey = (PointKey, PointKey);

/// Map from `(start, end)` to a previously computed value
#[derive(Debug, Clone)]
pub struct PathCache<V> {
    capacity: usize,
    entries: HashMap<CacheKey, V>,
}

impl<V: Clone> PathCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::new(),
        }
    }

    fn key(start: Point2D, end: Point2D) -> CacheKey {
        (start.key(), end.key())
    }

    pub fn get(&self, start: Point2D, end: Point2D) -> Option<V> {
        self.entries.get(&Self::key(start, end)).cloned()
    }

    /// Store a value, clearing everything first if the cache is full
    pub fn insert(&mut self, start: Point2D, end: Point2D, value: V) {
        let key = Self::key(start, end);
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            debug!("path cache full ({} entries), clearing", self.entries.len());
            self.entries.clear();
        }
        self.entries.insert(key, value);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<V: Clone> Default for PathCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    #[test]
    fn test_get_and_insert() {
        let mut cache = PathCache::new(10);
        assert!(cache.get(p(0.0, 0.0), p(1.0, 1.0)).is_none());
        cache.insert(p(0.0, 0.0), p(1.0, 1.0), 42);
        assert_eq!(cache.get(p(0.0, 0.0), p(1.0, 1.0)), Some(42));
        // Direction matters
        assert!(cache.get(p(1.0, 1.0), p(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_key_is_quantized() {
        let mut cache = PathCache::new(10);
        cache.insert(p(0.1 + 0.2, 5.0), p(1.0, 1.0), "route");
        assert_eq!(cache.get(p(0.3, 5.0), p(1.0, 1.0)), Some("route"));
    }

    #[test]
    fn test_overflow_clears_everything() {
        let mut cache = PathCache::new(3);
        for i in 0..3 {
            cache.insert(p(i as f64, 0.0), p(0.0, 0.0), i);
        }
        assert_eq!(cache.len(), 3);

        // Overwriting an existing key does not evict
        cache.insert(p(0.0, 0.0), p(0.0, 0.0), 10);
        assert_eq!(cache.len(), 3);

        cache.insert(p(9.0, 0.0), p(0.0, 0.0), 9);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(p(9.0, 0.0), p(0.0, 0.0)), Some(9));
        assert!(cache.get(p(1.0, 0.0), p(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_default_capacity() {
        let cache: PathCache<u8> = PathCache::default();
        assert_eq!(cache.capacity(), DEFAULT_CACHE_CAPACITY);
        assert!(cache.is_empty());
    }
}
