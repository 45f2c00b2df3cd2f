use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::PreviewData;

/// What the session knows about a URL once its fetch has resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
    Ready(PreviewData),
    /// Fetched but unusable: network failure, bad status or no content container.
    Unavailable,
}

impl CacheEntry {
    pub fn from_preview(preview: Option<PreviewData>) -> Self {
        preview.map_or(CacheEntry::Unavailable, CacheEntry::Ready)
    }
}

/// Bounds for the preview cache. The default keeps everything for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CachePolicy {
    pub max_entries: Option<usize>,
    pub ttl: Option<Duration>,
}

#[derive(Debug, Clone)]
struct Slot {
    entry: CacheEntry,
    stored_at: Instant,
}

#[derive(Debug, Clone)]
enum Store {
    Unbounded(HashMap<String, Slot>),
    /// Lookups use `peek`, so eviction follows insertion order.
    Bounded(LruCache<String, Slot>),
}

/// URL-keyed store of resolved previews.
#[derive(Debug, Clone)]
pub struct PreviewCache {
    ttl: Option<Duration>,
    store: Store,
}

impl PreviewCache {
    pub fn new(policy: CachePolicy) -> Self {
        let store = match policy.max_entries {
            Some(max) => {
                let capacity = NonZeroUsize::new(max).unwrap_or(NonZeroUsize::MIN);
                Store::Bounded(LruCache::new(capacity))
            }
            None => Store::Unbounded(HashMap::new()),
        };
        Self {
            ttl: policy.ttl,
            store,
        }
    }

    /// Looks up `key`; entries past their TTL read as absent.
    pub fn get(&self, key: &str, now: Instant) -> Option<&CacheEntry> {
        let slot = match &self.store {
            Store::Unbounded(slots) => slots.get(key)?,
            Store::Bounded(slots) => slots.peek(key)?,
        };
        if let Some(ttl) = self.ttl {
            if now.saturating_duration_since(slot.stored_at) >= ttl {
                return None;
            }
        }
        Some(&slot.entry)
    }

    pub fn insert(&mut self, key: String, entry: CacheEntry, now: Instant) {
        let slot = Slot {
            entry,
            stored_at: now,
        };
        match &mut self.store {
            Store::Unbounded(slots) => {
                slots.insert(key, slot);
            }
            Store::Bounded(slots) => {
                slots.put(key, slot);
            }
        }
    }

    pub fn len(&self) -> usize {
        match &self.store {
            Store::Unbounded(slots) => slots.len(),
            Store::Bounded(slots) => slots.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for PreviewCache {
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(title: &str) -> CacheEntry {
        CacheEntry::Ready(PreviewData {
            title: title.to_string(),
            excerpt: String::new(),
            sections: Vec::new(),
        })
    }

    #[test]
    fn unbounded_by_default() {
        let now = Instant::now();
        let mut cache = PreviewCache::default();
        for i in 0..100 {
            cache.insert(format!("https://a/{i}"), CacheEntry::Unavailable, now);
        }
        assert_eq!(cache.len(), 100);
        assert_eq!(
            cache.get("https://a/0", now + Duration::from_secs(86_400)),
            Some(&CacheEntry::Unavailable)
        );
    }

    #[test]
    fn evicts_oldest_beyond_max_entries() {
        let now = Instant::now();
        let mut cache = PreviewCache::new(CachePolicy {
            max_entries: Some(2),
            ttl: None,
        });
        cache.insert("a".into(), data("A"), now);
        cache.insert("b".into(), data("B"), now);
        cache.insert("a".into(), data("A2"), now);
        cache.insert("c".into(), data("C"), now);
        assert_eq!(cache.len(), 2);
        assert!(cache.get("b", now).is_none());
        assert_eq!(cache.get("a", now), Some(&data("A2")));
    }

    #[test]
    fn zero_max_entries_keeps_the_latest() {
        let now = Instant::now();
        let mut cache = PreviewCache::new(CachePolicy {
            max_entries: Some(0),
            ttl: None,
        });
        cache.insert("a".into(), data("A"), now);
        cache.insert("b".into(), data("B"), now);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("b", now), Some(&data("B")));
    }

    #[test]
    fn lookups_do_not_refresh_eviction_order() {
        let now = Instant::now();
        let mut cache = PreviewCache::new(CachePolicy {
            max_entries: Some(2),
            ttl: None,
        });
        cache.insert("a".into(), data("A"), now);
        cache.insert("b".into(), data("B"), now);
        assert!(cache.get("a", now).is_some());
        cache.insert("c".into(), data("C"), now);
        assert!(cache.get("a", now).is_none());
        assert!(cache.get("b", now).is_some());
    }

    #[test]
    fn bounded_entries_still_expire() {
        let now = Instant::now();
        let mut cache = PreviewCache::new(CachePolicy {
            max_entries: Some(4),
            ttl: Some(Duration::from_secs(30)),
        });
        cache.insert("a".into(), CacheEntry::Unavailable, now);
        assert!(cache.get("a", now + Duration::from_secs(29)).is_some());
        assert!(cache.get("a", now + Duration::from_secs(30)).is_none());
    }

    #[test]
    fn expired_entries_read_as_absent() {
        let now = Instant::now();
        let mut cache = PreviewCache::new(CachePolicy {
            max_entries: None,
            ttl: Some(Duration::from_secs(60)),
        });
        cache.insert("a".into(), data("A"), now);
        assert!(cache.get("a", now + Duration::from_secs(59)).is_some());
        assert!(cache.get("a", now + Duration::from_secs(60)).is_none());
    }
}
