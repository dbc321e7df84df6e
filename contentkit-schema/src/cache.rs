//! Key-value cache for generated schemas.
//!
//! Entries expire after a sliding window of disuse or an absolute age,
//! whichever comes first. Readers and writers never block each other for
//! long; recomputing an expired schema in two callers at once is allowed.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::trace;

use crate::node::ContentSchema;

/// Lifetime of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtl {
    /// Expire when not read for this long
    pub sliding: Duration,
    /// Expire this long after insertion regardless of reads
    pub absolute: Duration,
}

impl CacheTtl {
    pub fn new(sliding: Duration, absolute: Duration) -> Self {
        Self { sliding, absolute }
    }
}

/// Cache collaborator used by the schema generator.
pub trait SchemaCache: Send + Sync {
    fn get(&self, key: &str) -> Option<Arc<ContentSchema>>;

    fn set(&self, key: &str, value: Arc<ContentSchema>, ttl: CacheTtl);

    fn remove(&self, key: &str);

    fn clear(&self);
}

#[derive(Debug)]
struct Entry {
    value: Arc<ContentSchema>,
    ttl: CacheTtl,
    inserted: Instant,
    last_access: Instant,
}

impl Entry {
    fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.last_access) >= self.ttl.sliding
            || now.duration_since(self.inserted) >= self.ttl.absolute
    }
}

/// In-process schema cache.
#[derive(Debug, Default)]
pub struct MemorySchemaCache {
    entries: DashMap<String, Entry>,
}

impl MemorySchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        self.entries.retain(|_, entry| !entry.expired(now));
    }
}

impl SchemaCache for MemorySchemaCache {
    fn get(&self, key: &str) -> Option<Arc<ContentSchema>> {
        let now = Instant::now();
        if let Some(mut entry) = self.entries.get_mut(key) {
            if !entry.expired(now) {
                entry.last_access = now;
                return Some(entry.value.clone());
            }
        } else {
            return None;
        }
        trace!(key, "schema cache entry expired");
        self.entries.remove_if(key, |_, entry| entry.expired(now));
        None
    }

    fn set(&self, key: &str, value: Arc<ContentSchema>, ttl: CacheTtl) {
        let now = Instant::now();
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                ttl,
                inserted: now,
                last_access: now,
            },
        );
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }

    fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const LONG: Duration = Duration::from_secs(3600);

    fn schema(title: &str) -> Arc<ContentSchema> {
        let mut schema = ContentSchema::new();
        schema.title = Some(title.to_string());
        Arc::new(schema)
    }

    #[test]
    fn hit_within_window() {
        let cache = MemorySchemaCache::new();
        cache.set("page", schema("Page"), CacheTtl::new(LONG, LONG));
        assert_eq!(cache.get("page").unwrap().title.as_deref(), Some("Page"));
        assert!(cache.get("news").is_none());
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let cache = MemorySchemaCache::new();
        cache.set("page", schema("Page"), CacheTtl::new(Duration::ZERO, LONG));
        assert!(cache.get("page").is_none());
        assert!(cache.is_empty());

        cache.set("page", schema("Page"), CacheTtl::new(LONG, Duration::ZERO));
        assert!(cache.get("page").is_none());
    }

    #[test]
    fn sliding_window_is_renewed_by_reads() {
        let cache = MemorySchemaCache::new();
        let ttl = CacheTtl::new(Duration::from_millis(400), LONG);
        cache.set("page", schema("Page"), ttl);
        for _ in 0..3 {
            thread::sleep(Duration::from_millis(150));
            assert!(cache.get("page").is_some());
        }
        thread::sleep(Duration::from_millis(500));
        assert!(cache.get("page").is_none());
    }

    #[test]
    fn absolute_ceiling_wins_over_reads() {
        let cache = MemorySchemaCache::new();
        let ttl = CacheTtl::new(LONG, Duration::from_millis(100));
        cache.set("page", schema("Page"), ttl);
        assert!(cache.get("page").is_some());
        thread::sleep(Duration::from_millis(150));
        assert!(cache.get("page").is_none());
    }

    #[test]
    fn purge_and_clear() {
        let cache = MemorySchemaCache::new();
        cache.set("a", schema("A"), CacheTtl::new(Duration::ZERO, LONG));
        cache.set("b", schema("B"), CacheTtl::new(LONG, LONG));
        cache.purge_expired();
        assert_eq!(cache.len(), 1);
        cache.remove("b");
        assert!(cache.is_empty());
        cache.set("c", schema("C"), CacheTtl::new(LONG, LONG));
        cache.clear();
        assert!(cache.is_empty());
    }
}
