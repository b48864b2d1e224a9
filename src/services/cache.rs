use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::models::{Service, ShopConfig, Therapist};

#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    pub ttl: Duration,
}

impl CachePolicy {
    pub fn from_secs(secs: u64) -> Self {
        Self {
            ttl: Duration::from_secs(secs),
        }
    }

    /// Every read goes to the loader.
    pub fn disabled() -> Self {
        Self { ttl: Duration::ZERO }
    }
}

struct Entry<T> {
    value: T,
    loaded_at: Instant,
}

/// Read-through cache keyed by string. Entries older than the policy's TTL are reloaded.
pub struct TtlCache<T> {
    policy: CachePolicy,
    entries: Mutex<HashMap<String, Entry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries
            .get(key)
            .filter(|entry| entry.loaded_at.elapsed() < self.policy.ttl)
            .map(|entry| entry.value.clone())
    }

    pub fn put(&self, key: &str, value: T) {
        if self.policy.ttl.is_zero() {
            return;
        }
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key.to_string(),
            Entry {
                value,
                loaded_at: Instant::now(),
            },
        );
    }

    /// Returns the cached value or runs `load` and caches its result. Errors are not cached.
    pub fn get_or_load<E>(&self, key: &str, load: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = load()?;
        self.put(key, value.clone());
        Ok(value)
    }

    pub fn invalidate(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
    }
}

const ALL: &str = "all";

/// Reference data the board and forms read on every request.
pub struct CatalogCache {
    services: TtlCache<Vec<Service>>,
    therapists: TtlCache<Vec<Therapist>>,
    config: TtlCache<ShopConfig>,
}

impl CatalogCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            services: TtlCache::new(policy),
            therapists: TtlCache::new(policy),
            config: TtlCache::new(policy),
        }
    }

    pub fn services<E>(&self, load: impl FnOnce() -> Result<Vec<Service>, E>) -> Result<Vec<Service>, E> {
        self.services.get_or_load(ALL, load)
    }

    pub fn therapists<E>(
        &self,
        load: impl FnOnce() -> Result<Vec<Therapist>, E>,
    ) -> Result<Vec<Therapist>, E> {
        self.therapists.get_or_load(ALL, load)
    }

    pub fn config<E>(&self, load: impl FnOnce() -> Result<ShopConfig, E>) -> Result<ShopConfig, E> {
        self.config.get_or_load(ALL, load)
    }

    pub fn invalidate_services(&self) {
        self.services.invalidate(ALL);
    }

    pub fn invalidate_therapists(&self) {
        self.therapists.invalidate(ALL);
    }

    pub fn invalidate_config(&self) {
        self.config.invalidate(ALL);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counting_load(calls: &Cell<u32>) -> Result<u32, String> {
        calls.set(calls.get() + 1);
        Ok(calls.get())
    }

    #[test]
    fn test_hit_within_ttl() {
        let cache = TtlCache::new(CachePolicy::from_secs(60));
        let calls = Cell::new(0);
        assert_eq!(cache.get_or_load("k", || counting_load(&calls)), Ok(1));
        assert_eq!(cache.get_or_load("k", || counting_load(&calls)), Ok(1));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_zero_ttl_always_reloads() {
        let cache = TtlCache::new(CachePolicy::disabled());
        let calls = Cell::new(0);
        cache.get_or_load("k", || counting_load(&calls)).unwrap();
        cache.get_or_load("k", || counting_load(&calls)).unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let cache = TtlCache::new(CachePolicy::from_secs(60));
        let calls = Cell::new(0);
        cache.get_or_load("k", || counting_load(&calls)).unwrap();
        cache.invalidate("k");
        assert_eq!(cache.get_or_load("k", || counting_load(&calls)), Ok(2));
    }

    #[test]
    fn test_errors_are_not_cached() {
        let cache: TtlCache<u32> = TtlCache::new(CachePolicy::from_secs(60));
        let failed: Result<u32, String> = cache.get_or_load("k", || Err("down".to_string()));
        assert!(failed.is_err());
        assert!(cache.get("k").is_none());
    }

    #[test]
    fn test_expired_entry_is_reloaded() {
        let cache = TtlCache::new(CachePolicy {
            ttl: Duration::from_millis(5),
        });
        let calls = Cell::new(0);
        cache.get_or_load("k", || counting_load(&calls)).unwrap();
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get_or_load("k", || counting_load(&calls)), Ok(2));
    }
}
