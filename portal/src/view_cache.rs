use serde_json::Value;
use std::collections::HashMap;
use std::sync::RwLock;

/// Path-keyed memo of rendered catalog views.
///
/// A successful submission invalidates the assignment views so the next read
/// rebuilds them.
#[derive(Debug, Default)]
pub struct ViewCache {
    entries: RwLock<HashMap<String, Value>>,
}

impl ViewCache {
    pub fn get(&self, path: &str) -> Option<Value> {
        self.entries.read().unwrap().get(path).cloned()
    }

    pub fn put(&self, path: &str, view: Value) {
        self.entries.write().unwrap().insert(path.to_string(), view);
    }

    /// Returns whether a cached view was actually dropped.
    pub fn invalidate(&self, path: &str) -> bool {
        self.entries.write().unwrap().remove(path).is_some()
    }
}
