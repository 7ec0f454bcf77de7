// src/cache.rs

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Memoizes fetch results per ticker for a time-to-live.
///
/// Entries are keyed by `(ticker, bucket)` where the bucket is the fetch time
/// in whole TTL slices since the Unix epoch. A lookup only hits entries in the
/// current bucket, so every entry expires when its slice ends. A zero TTL
/// disables caching.
#[derive(Debug)]
pub struct FetchCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<(String, u64), V>>,
}

impl<V: Clone> FetchCache<V> {
    pub fn new(ttl: Duration) -> Self {
        FetchCache {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn bucket(&self, at: SystemTime) -> Option<u64> {
        let ttl_secs = self.ttl.as_secs();
        if ttl_secs == 0 {
            return None;
        }
        let elapsed = at.duration_since(UNIX_EPOCH).unwrap_or_default();
        Some(elapsed.as_secs() / ttl_secs)
    }

    pub fn get(&self, ticker: &str) -> Option<V> {
        self.get_at(ticker, SystemTime::now())
    }

    pub fn get_at(&self, ticker: &str, now: SystemTime) -> Option<V> {
        let bucket = self.bucket(now)?;
        self.lock().get(&(cache_key(ticker), bucket)).cloned()
    }

    pub fn insert(&self, ticker: &str, value: V) {
        self.insert_at(ticker, value, SystemTime::now())
    }

    pub fn insert_at(&self, ticker: &str, value: V, now: SystemTime) {
        if let Some(bucket) = self.bucket(now) {
            self.lock().insert((cache_key(ticker), bucket), value);
        }
    }

    // Drops every bucket held for the ticker
    pub fn invalidate(&self, ticker: &str) -> usize {
        let key = cache_key(ticker);
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|(cached, _), _| *cached != key);
        before - entries.len()
    }

    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(SystemTime::now())
    }

    pub fn purge_expired_at(&self, now: SystemTime) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        match self.bucket(now) {
            Some(current) => entries.retain(|(_, bucket), _| *bucket == current),
            None => entries.clear(),
        }
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<(String, u64), V>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn cache_key(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}
