//! LRU cache of resolution outcomes.
//!
//! Worth enabling when contexts carry many dimensions or the same
//! `(action, context)` pairs are dispatched at a high rate. Both matches and
//! misses are cached. The cache is tied to a registry generation: any
//! registry mutation clears it, and outcomes computed against an older
//! generation are dropped instead of inserted.

use action_dispatch_core::{Action, Context};
use std::collections::{BTreeMap, HashMap};

/// Default maximum number of cached resolutions.
pub const DEFAULT_CACHE_MAXSIZE: usize = 256;

/// Cache statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheInfo {
    /// Lookups answered from the cache.
    pub hits: u64,
    /// Lookups that had to resolve against the registry.
    pub misses: u64,
    /// Maximum number of entries.
    pub max_size: usize,
    /// Current number of entries.
    pub current_size: usize,
}

struct CacheEntry<V> {
    value: V,
    last_used: u64,
}

pub(crate) struct ResolutionCache<V> {
    entries: HashMap<Action, HashMap<Context, CacheEntry<V>>>,
    /// Keys ordered by last use; the first one is evicted next.
    recency: BTreeMap<u64, (Action, Context)>,
    max_size: usize,
    generation: u64,
    clock: u64,
    hits: u64,
    misses: u64,
}

impl<V: Clone> ResolutionCache<V> {
    pub(crate) fn new(max_size: usize, generation: u64) -> Self {
        Self {
            entries: HashMap::new(),
            recency: BTreeMap::new(),
            max_size,
            generation,
            clock: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// Look up a cached outcome, counting the hit or miss.
    pub(crate) fn get(&mut self, action: &Action, context: &Context) -> Option<V> {
        self.clock += 1;
        let Some(entry) = self
            .entries
            .get_mut(action)
            .and_then(|contexts| contexts.get_mut(context))
        else {
            self.misses += 1;
            return None;
        };
        let previous = std::mem::replace(&mut entry.last_used, self.clock);
        let value = entry.value.clone();
        if let Some(key) = self.recency.remove(&previous) {
            self.recency.insert(self.clock, key);
        }
        self.hits += 1;
        Some(value)
    }

    /// Store an outcome computed against registry `generation`.
    pub(crate) fn insert(&mut self, action: Action, context: Context, value: V, generation: u64) {
        if generation != self.generation || self.max_size == 0 {
            return;
        }
        let previous = self
            .entries
            .get(&action)
            .and_then(|contexts| contexts.get(&context))
            .map(|entry| entry.last_used);
        match previous {
            Some(last_used) => {
                self.recency.remove(&last_used);
            }
            None if self.recency.len() >= self.max_size => self.evict_least_recently_used(),
            None => {}
        }
        self.clock += 1;
        self.recency.insert(self.clock, (action.clone(), context.clone()));
        let entry = CacheEntry {
            value,
            last_used: self.clock,
        };
        self.entries.entry(action).or_default().insert(context, entry);
    }

    fn evict_least_recently_used(&mut self) {
        let Some((_, (action, context))) = self.recency.pop_first() else {
            return;
        };
        if let Some(contexts) = self.entries.get_mut(&action) {
            contexts.remove(&context);
            if contexts.is_empty() {
                self.entries.remove(&action);
            }
        }
    }

    /// Drop all entries and statistics and follow a new registry generation.
    pub(crate) fn invalidate(&mut self, generation: u64) {
        self.clear();
        self.generation = generation;
    }

    /// Drop all entries and statistics.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub(crate) fn info(&self) -> CacheInfo {
        CacheInfo {
            hits: self.hits,
            misses: self.misses,
            max_size: self.max_size,
            current_size: self.recency.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str, region: &str) -> (Action, Context) {
        (
            Action::new(name).unwrap(),
            Context::from_dimensions([("region", region)]).unwrap(),
        )
    }

    #[test]
    fn test_hits_and_misses() {
        let mut cache = ResolutionCache::new(4, 0);
        let (action, context) = key("checkout", "EU");

        assert_eq!(cache.get(&action, &context), None);
        cache.insert(action.clone(), context.clone(), "eu", 0);
        assert_eq!(cache.get(&action, &context), Some("eu"));

        let info = cache.info();
        assert_eq!(info.hits, 1);
        assert_eq!(info.misses, 1);
        assert_eq!(info.current_size, 1);
        assert_eq!(info.max_size, 4);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let mut cache = ResolutionCache::new(2, 0);
        let (a, eu) = key("checkout", "EU");
        let (_, us) = key("checkout", "US");
        let (_, jp) = key("checkout", "JP");

        cache.insert(a.clone(), eu.clone(), 1, 0);
        cache.insert(a.clone(), us.clone(), 2, 0);
        // Touch EU so US becomes the eviction candidate.
        assert_eq!(cache.get(&a, &eu), Some(1));
        cache.insert(a.clone(), jp.clone(), 3, 0);

        assert_eq!(cache.info().current_size, 2);
        assert_eq!(cache.get(&a, &eu), Some(1));
        assert_eq!(cache.get(&a, &jp), Some(3));
        assert_eq!(cache.get(&a, &us), None);
    }

    #[test]
    fn test_eviction_keeps_size_bounded() {
        let mut cache = ResolutionCache::new(3, 0);
        let action = Action::new("checkout").unwrap();
        let context = |n: i64| Context::from_dimensions([("user", n)]).unwrap();

        cache.insert(action.clone(), context(0), 0, 0);
        for n in 1..100 {
            // Keep the first entry hot while the rest churn through.
            assert_eq!(cache.get(&action, &context(0)), Some(0));
            cache.insert(action.clone(), context(n), n, 0);
            assert!(cache.info().current_size <= 3);
        }

        assert_eq!(cache.info().current_size, 3);
        assert_eq!(cache.get(&action, &context(0)), Some(0));
        assert_eq!(cache.get(&action, &context(99)), Some(99));
        assert_eq!(cache.get(&action, &context(98)), Some(98));
        assert_eq!(cache.get(&action, &context(97)), None);
    }

    #[test]
    fn test_reinsert_refreshes_recency() {
        let mut cache = ResolutionCache::new(2, 0);
        let (a, eu) = key("checkout", "EU");
        let (_, us) = key("checkout", "US");
        let (_, jp) = key("checkout", "JP");

        cache.insert(a.clone(), eu.clone(), 1, 0);
        cache.insert(a.clone(), us.clone(), 2, 0);
        cache.insert(a.clone(), eu.clone(), 10, 0);
        cache.insert(a.clone(), jp.clone(), 3, 0);

        assert_eq!(cache.info().current_size, 2);
        assert_eq!(cache.get(&a, &eu), Some(10));
        assert_eq!(cache.get(&a, &us), None);
    }

    #[test]
    fn test_stale_generation_not_inserted() {
        let mut cache = ResolutionCache::new(4, 0);
        let (action, context) = key("checkout", "EU");

        cache.invalidate(1);
        cache.insert(action.clone(), context.clone(), "stale", 0);
        assert_eq!(cache.info().current_size, 0);

        cache.insert(action.clone(), context.clone(), "fresh", 1);
        assert_eq!(cache.get(&action, &context), Some("fresh"));
    }

    #[test]
    fn test_zero_size_caches_nothing() {
        let mut cache = ResolutionCache::new(0, 0);
        let (action, context) = key("checkout", "EU");
        cache.insert(action.clone(), context.clone(), 1, 0);
        assert_eq!(cache.get(&action, &context), None);
        assert_eq!(cache.info().misses, 1);
        assert_eq!(cache.info().current_size, 0);
    }

    #[test]
    fn test_clear_resets_statistics() {
        let mut cache = ResolutionCache::new(4, 0);
        let (action, context) = key("checkout", "EU");
        cache.insert(action.clone(), context.clone(), 1, 0);
        cache.get(&action, &context);
        cache.clear();
        assert_eq!(cache.info(), CacheInfo { max_size: 4, ..CacheInfo::default() });
    }
}
