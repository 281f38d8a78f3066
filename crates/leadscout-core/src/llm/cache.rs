//! LLM response caching to reduce API calls

use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, SystemTime};

/// Cache entry with TTL
#[derive(Clone)]
struct CacheEntry {
    value: String,
    expires_at: SystemTime,
}

/// In-memory cache for chat completions
pub struct LLMCache {
    entries: Arc<RwLock<HashMap<String, CacheEntry>>>,
    default_ttl: Duration,
    max_entries: usize,
}

impl LLMCache {
    /// Create new cache with default TTL of 1 hour
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(3600))
    }

    /// Create cache with custom TTL
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            default_ttl: ttl,
            max_entries: 512,
        }
    }

    /// Get cached value if exists and not expired
    pub fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read().ok()?;
        let entry = entries.get(key)?;

        if SystemTime::now() < entry.expires_at {
            Some(entry.value.clone())
        } else {
            None
        }
    }

    /// Set cached value with default TTL
    ///
    /// When full, expired entries are evicted first; if nothing expired the
    /// new value is not cached.
    pub fn set(&self, key: String, value: String) {
        let Ok(mut entries) = self.entries.write() else {
            return;
        };

        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            let now = SystemTime::now();
            entries.retain(|_, entry| now < entry.expires_at);
            if entries.len() >= self.max_entries {
                tracing::debug!("LLM cache full, skipping insert");
                return;
            }
        }

        let expires_at = SystemTime::now() + self.default_ttl;
        entries.insert(key, CacheEntry { value, expires_at });
    }

    /// Number of stored entries, expired or not
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for LLMCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Generate cache key for chat completions
pub fn chat_cache_key(model: &str, messages: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(model.as_bytes());
    hasher.update(&[0]);
    hasher.update(messages.as_bytes());
    format!("chat:{}:{}", model, hasher.finalize().to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_basic() {
        let cache = LLMCache::new();

        cache.set("key1".to_string(), "value1".to_string());
        assert_eq!(cache.get("key1"), Some("value1".to_string()));
        assert_eq!(cache.get("key2"), None);
    }

    #[test]
    fn test_cache_expiry() {
        let cache = LLMCache::with_ttl(Duration::from_millis(100));

        cache.set("key1".to_string(), "value1".to_string());
        assert_eq!(cache.get("key1"), Some("value1".to_string()));

        std::thread::sleep(Duration::from_millis(150));
        assert_eq!(cache.get("key1"), None);
    }

    #[test]
    fn test_full_cache_evicts_expired() {
        let mut cache = LLMCache::with_ttl(Duration::from_millis(50));
        cache.max_entries = 2;

        cache.set("a".to_string(), "1".to_string());
        cache.set("b".to_string(), "2".to_string());
        cache.set("c".to_string(), "3".to_string());
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("c"), None);

        std::thread::sleep(Duration::from_millis(80));
        cache.set("c".to_string(), "3".to_string());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("c"), Some("3".to_string()));
    }

    #[test]
    fn test_cache_key_generation() {
        let key1 = chat_cache_key("model1", "text1");
        let key2 = chat_cache_key("model1", "text1");
        let key3 = chat_cache_key("model1", "text2");

        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
    }
}
