use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Results stored under one token, keyed by result key
pub type ResultSet = HashMap<String, f64>;

/// In-memory result store, namespaced by client token
///
/// One lock covers the whole two-level map, so every `save` and
/// `get_all_by_token` is serialized against every other write.
pub struct ResultStore {
    results: RwLock<HashMap<String, ResultSet>>,
}

impl ResultStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            results: RwLock::new(HashMap::new()),
        }
    }

    /// Save `value` under `key` in the namespace of `token`
    ///
    /// The namespace is created on first use. An existing entry with the same
    /// key is overwritten.
    pub fn save(&self, token: impl Into<String>, key: impl Into<String>, value: f64) {
        // `save` never leaves the map half-updated, so a poisoned guard is safe to reuse
        let mut results = self.results.write().unwrap_or_else(PoisonError::into_inner);
        results
            .entry(token.into())
            .or_default()
            .insert(key.into(), value);
    }

    /// Get a copy of every result stored under `token`
    ///
    /// Unknown tokens yield an empty set and are not added to the store.
    pub fn get_all_by_token(&self, token: &str) -> ResultSet {
        let results = self.results.read().unwrap_or_else(PoisonError::into_inner);
        results.get(token).cloned().unwrap_or_default()
    }
}

impl Default for ResultStore {
    fn default() -> Self {
        Self::new()
    }
}
