//! Response cache with a revalidation window.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::response::Response;

/// Default revalidation window for backend reads.
pub const DEFAULT_REVALIDATE: Duration = Duration::from_secs(60);

/// Default cap on stored URLs.
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

#[derive(Debug, Clone)]
struct CachedResponse {
    response: Response,
    stored_at: Instant,
}

/// Per-URL cache of successful GET responses.
///
/// An entry is served until it is older than the window, after which the
/// next read goes to the backend and replaces it. Every write sweeps stale
/// entries, and the least recently used entry is evicted at capacity.
#[derive(Debug)]
pub struct RevalidateCache {
    window: Duration,
    entries: Mutex<LruCache<String, CachedResponse>>,
}

impl RevalidateCache {
    pub fn new(window: Duration) -> Self {
        Self::with_capacity(window, DEFAULT_MAX_ENTRIES)
    }

    /// A cache holding at most `max_entries` URLs. A cap of 0 is treated as 1.
    pub fn with_capacity(window: Duration, max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            window,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// A fresh response for `url`, if any.
    pub fn get(&self, url: &str) -> Option<Response> {
        self.get_at(url, Instant::now())
    }

    fn get_at(&self, url: &str, now: Instant) -> Option<Response> {
        let mut entries = self.entries.lock().ok()?;
        let fresh = entries
            .get(url)
            .map(|entry| (self.is_fresh(entry, now), entry.response.clone()));
        match fresh {
            Some((true, response)) => Some(response),
            Some((false, _)) => {
                entries.pop(url);
                None
            }
            None => None,
        }
    }

    /// Store a response. Non-2xx responses are ignored.
    pub fn put(&self, url: &str, response: &Response) {
        self.put_at(url, response, Instant::now());
    }

    fn put_at(&self, url: &str, response: &Response, now: Instant) {
        if !response.is_success() || self.window.is_zero() {
            return;
        }
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };
        let stale: Vec<String> = entries
            .iter()
            .filter(|(_, entry)| !self.is_fresh(entry, now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in stale {
            entries.pop(&key);
        }
        entries.put(
            url.to_string(),
            CachedResponse {
                response: response.clone(),
                stored_at: now,
            },
        );
    }

    fn is_fresh(&self, entry: &CachedResponse, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) < self.window
    }

    /// Drop every entry.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RevalidateCache {
    fn default() -> Self {
        Self::new(DEFAULT_REVALIDATE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_entries_are_served() {
        let cache = RevalidateCache::default();
        cache.put("http://api.test/a", &Response::json_body(200, "[]"));
        assert_eq!(cache.get("http://api.test/a").unwrap().body, b"[]");
        assert!(cache.get("http://api.test/b").is_none());
    }

    #[test]
    fn test_stale_entries_are_evicted() {
        let cache = RevalidateCache::new(Duration::from_secs(60));
        cache.put("u", &Response::json_body(200, "{}"));
        let later = Instant::now() + Duration::from_secs(61);
        assert!(cache.get_at("u", later).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_writes_sweep_stale_entries() {
        let cache = RevalidateCache::new(Duration::from_secs(60));
        let start = Instant::now();
        for i in 0..500 {
            let url = format!("http://api.test/api/products/?search=q{}", i);
            cache.put_at(&url, &Response::json_body(200, "[]"), start);
        }
        assert_eq!(cache.len(), 500);

        let later = start + Duration::from_secs(61);
        cache.put_at("http://api.test/api/hot/", &Response::json_body(200, "[]"), later);
        assert_eq!(cache.len(), 1);
        assert!(cache.get_at("http://api.test/api/hot/", later).is_some());
    }

    #[test]
    fn test_least_recently_used_dropped_at_capacity() {
        let cache = RevalidateCache::with_capacity(Duration::from_secs(60), 2);
        let start = Instant::now();
        let body = Response::json_body(200, "[]");
        cache.put_at("a", &body, start);
        cache.put_at("b", &body, start);
        assert!(cache.get_at("a", start).is_some());

        cache.put_at("c", &body, start);
        assert_eq!(cache.len(), 2);
        assert!(cache.get_at("b", start).is_none());
        assert!(cache.get_at("a", start).is_some());
        assert!(cache.get_at("c", start).is_some());
    }

    #[test]
    fn test_errors_are_not_stored() {
        let cache = RevalidateCache::default();
        cache.put("u", &Response::json_body(503, ""));
        assert!(cache.is_empty());

        let disabled = RevalidateCache::new(Duration::ZERO);
        disabled.put("u", &Response::json_body(200, "{}"));
        assert!(disabled.is_empty());
    }
}
