// src/proxy/cache.rs
//
// In-memory TTL cache for proxy answers. Expired entries are dropped on read and swept on
// every insert; past `MAX_ENTRIES` the oldest live entry goes.

use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const MAX_ENTRIES: usize = 1024;

pub struct TtlCache<V> {
    ttl: Duration,
    entries: HashMap<String, (Instant, V)>,
}

impl<V: Clone> TtlCache<V> {
    /// A zero TTL disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: HashMap::new() }
    }

    pub fn get(&mut self, key: &str) -> Option<V> {
        let fresh = match self.entries.get(key) {
            Some((at, _)) => at.elapsed() < self.ttl,
            None => return None,
        };
        if !fresh {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|(_, v)| v.clone())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        if self.ttl.is_zero() {
            return;
        }
        let key = key.into();
        let ttl = self.ttl;
        self.entries.retain(|_, (at, _)| at.elapsed() < ttl);

        if self.entries.len() >= MAX_ENTRIES && !self.entries.contains_key(&key) {
            let oldest = self.entries
                .iter()
                .min_by_key(|(_, (at, _))| *at)
                .map(|(k, _)| k.clone());
            if let Some(k) = oldest {
                self.entries.remove(&k);
            }
        }
        self.entries.insert(key, (Instant::now(), value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_until_expiry() {
        let mut c = TtlCache::new(Duration::from_secs(60));
        c.insert("latest", 7u32);
        assert_eq!(c.get("latest"), Some(7));
        assert_eq!(c.get("result:2025-03-04"), None);
    }

    #[test]
    fn expired_entries_are_dropped() {
        let mut c = TtlCache::new(Duration::from_millis(5));
        c.insert("latest", 1u32);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(c.get("latest"), None);
        assert!(c.is_empty());
    }

    #[test]
    fn insert_sweeps_expired_keys() {
        let mut c = TtlCache::new(Duration::from_millis(5));
        for i in 0..500 {
            c.insert(format!("result:{i}"), i);
        }
        std::thread::sleep(Duration::from_millis(20));
        c.insert("latest", 0);
        assert_eq!(c.len(), 1);
        assert_eq!(c.get("latest"), Some(0));
    }

    #[test]
    fn size_is_capped() {
        let mut c = TtlCache::new(Duration::from_secs(60));
        for i in 0..MAX_ENTRIES + 10 {
            c.insert(format!("result:{i}"), i);
        }
        assert_eq!(c.len(), MAX_ENTRIES);
        assert_eq!(c.get(&format!("result:{}", MAX_ENTRIES + 9)), Some(MAX_ENTRIES + 9));
    }

    #[test]
    fn zero_ttl_stores_nothing() {
        let mut c = TtlCache::new(Duration::ZERO);
        c.insert("latest", 1u32);
        assert_eq!(c.len(), 0);
    }
}
