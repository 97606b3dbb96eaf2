use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Process-wide key/value store.
///
/// Components read from it through their declared key allowlist during a
/// compile pass; the pass borrows the store immutably, so every read is
/// atomic by construction and writes can only happen between compiles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Store {
    entries: Map<String, Value>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key)
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
    use serde_json::json;

    #[test]
    fn test_store_roundtrip() {
        let mut store = Store::new();
        assert!(store.is_empty());
        assert!(!store.has("user"));

        store.insert("user", json!({"name": "Ada"}));
        assert!(store.has("user"));
        assert_eq!(store.get("user"), Some(&json!({"name": "Ada"})));
        assert_eq!(store.len(), 1);

        let old = store.insert("user", json!("replaced"));
        assert_eq!(old, Some(json!({"name": "Ada"})));

        assert_eq!(store.remove("user"), Some(json!("replaced")));
        assert!(!store.has("user"));
    }
}
