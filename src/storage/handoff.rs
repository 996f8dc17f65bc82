//! Pending-animation hand-off
//!
//! The gallery page stashes the chosen animation under a well-known key; the
//! editor page picks it up on start-up and removes it once it has been applied.
//! On the page the store is `window.localStorage`; tests use `MemoryStore`.

use std::collections::HashMap;

use crate::error::AnimResult;
use crate::models::AnimationRecord;

/// Minimal key/value storage, shaped like the Web Storage API
pub trait PendingStore {
    fn get_item(&self, key: &str) -> AnimResult<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> AnimResult<()>;
    fn remove_item(&mut self, key: &str) -> AnimResult<()>;
}

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl PendingStore for MemoryStore {
    fn get_item(&self, key: &str) -> AnimResult<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> AnimResult<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> AnimResult<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// Store `record` for the next page
pub fn stash_pending(store: &mut dyn PendingStore, key: &str, record: &AnimationRecord) -> AnimResult<()> {
    store.set_item(key, &record.to_json())
}

/// Read (without removing) the pending animation, if one is stored
pub fn peek_pending(store: &dyn PendingStore, key: &str) -> AnimResult<Option<AnimationRecord>> {
    match store.get_item(key)? {
        Some(text) => AnimationRecord::from_json(&text).map(Some),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stash_then_peek() {
        let mut store = MemoryStore::new();
        let record = AnimationRecord::blank(5.0, 2, 2, 2).unwrap();

        stash_pending(&mut store, "pendingAnimation", &record).unwrap();
        let found = peek_pending(&store, "pendingAnimation").unwrap();

        assert_eq!(found, Some(record));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_peek_missing_and_corrupt() {
        let mut store = MemoryStore::new();
        assert_eq!(peek_pending(&store, "k").unwrap(), None);

        store.set_item("k", "{\"fps\": -1}").unwrap();
        assert!(peek_pending(&store, "k").is_err());
    }
}
