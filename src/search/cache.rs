//! Request canonicalization and the process-lifetime response cache.
//!
//! The fingerprint is **critical for determinism**: two logically identical
//! requests must always map to the same cache key. Bodies pass through
//! `serde_json::Value`, whose object maps are ordered, so key insertion order
//! in the caller cannot produce a false miss.
//!
//! The cache is a pure memoization layer scoped to one process: no eviction,
//! no TTL. Growth is bounded in practice by how many distinct
//! (query, parameters) pairs a session produces.

use std::collections::HashMap;

use parking_lot::Mutex;

/// Derive a deterministic cache key from (endpoint, request body).
///
/// Pure and infallible: identical inputs always yield identical keys, and
/// bodies differing in any value yield different keys.
pub fn request_key(endpoint: &str, body: &serde_json::Value) -> String {
    format!("{endpoint}|{body}")
}

/// Fingerprint -> raw response payload. Entries are never invalidated or
/// removed during the process's lifetime.
///
/// Request workers and the UI thread share this behind an `Arc`, so `get` and
/// `set` take the lock internally.
#[derive(Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, serde_json::Value>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<serde_json::Value> {
        self.entries.lock().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: serde_json::Value) {
        self.entries.lock().insert(key.to_string(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn identical_requests_share_a_key() {
        let a = json!({"query": "rust", "k": 10, "metric": "cosine"});
        let b = json!({"query": "rust", "k": 10, "metric": "cosine"});
        assert_eq!(request_key("http://h/search", &a), request_key("http://h/search", &b));
    }

    #[test]
    fn value_changes_change_the_key() {
        let a = json!({"query": "rust", "k": 10, "metric": "cosine"});
        let b = json!({"query": "rust", "k": 10, "metric": "dot"});
        assert_ne!(request_key("http://h/search", &a), request_key("http://h/search", &b));
    }

    #[test]
    fn key_insertion_order_is_irrelevant() {
        // serde_json::Value objects are ordered maps; building the same body
        // in a different field order must not split the cache.
        let mut a = serde_json::Map::new();
        a.insert("query".into(), json!("rust"));
        a.insert("k".into(), json!(10));
        let mut b = serde_json::Map::new();
        b.insert("k".into(), json!(10));
        b.insert("query".into(), json!("rust"));
        assert_eq!(
            request_key("e", &serde_json::Value::Object(a)),
            request_key("e", &serde_json::Value::Object(b)),
        );
    }

    #[test]
    fn cache_round_trips_raw_payloads() {
        let cache = ResponseCache::new();
        assert!(cache.is_empty());
        let payload = json!({"results": [{"id": "a", "text": "t", "score": 0.5}]});
        cache.set("k1", payload.clone());
        assert_eq!(cache.get("k1"), Some(payload));
        assert_eq!(cache.get("k2"), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn set_overwrites_in_place() {
        let cache = ResponseCache::new();
        cache.set("k", json!(1));
        cache.set("k", json!(2));
        assert_eq!(cache.get("k"), Some(json!(2)));
        assert_eq!(cache.len(), 1);
    }

    proptest! {
        #[test]
        fn request_key_is_deterministic(query in ".{0,40}", k in 1usize..=100) {
            let body = json!({"query": query, "k": k, "metric": "cosine"});
            prop_assert_eq!(
                request_key("http://h/search", &body),
                request_key("http://h/search", &body)
            );
        }

        #[test]
        fn distinct_k_values_never_collide(query in ".{0,40}", k in 1usize..=99) {
            let a = json!({"query": &query, "k": k, "metric": "cosine"});
            let b = json!({"query": &query, "k": k + 1, "metric": "cosine"});
            prop_assert_ne!(
                request_key("http://h/search", &a),
                request_key("http://h/search", &b)
            );
        }
    }
}
